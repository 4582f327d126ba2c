use crate::date_parser::parse_timestamp;
use shared_types::{ContributionRecord, GoalParticipation, GoalRecord, LoanRecord};
use std::collections::HashMap;

/// Contributions grouped once by member and by (member, goal) so the join
/// never rescans the full contribution list per member/goal pair.
pub struct ContributionIndex<'a> {
    by_member: HashMap<i64, Vec<&'a ContributionRecord>>,
    by_member_goal: HashMap<(i64, i64), Vec<&'a ContributionRecord>>,
}

impl<'a> ContributionIndex<'a> {
    pub fn new(contributions: &'a [ContributionRecord]) -> Self {
        let mut by_member: HashMap<i64, Vec<&ContributionRecord>> = HashMap::new();
        let mut by_member_goal: HashMap<(i64, i64), Vec<&ContributionRecord>> = HashMap::new();

        for contribution in contributions {
            by_member
                .entry(contribution.user_id)
                .or_default()
                .push(contribution);
            by_member_goal
                .entry((contribution.user_id, contribution.goal_id))
                .or_default()
                .push(contribution);
        }

        Self {
            by_member,
            by_member_goal,
        }
    }

    /// All of a member's contributions, in upstream order
    pub fn for_member(&self, user_id: i64) -> &[&'a ContributionRecord] {
        self.by_member
            .get(&user_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn for_member_goal(&self, user_id: i64, goal_id: i64) -> &[&'a ContributionRecord] {
        self.by_member_goal
            .get(&(user_id, goal_id))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Goals the member has at least one contribution against, in goal order.
/// Goals missing from `goals` never produce a participation.
pub fn goal_participations(
    user_id: i64,
    goals: &[GoalRecord],
    index: &ContributionIndex<'_>,
) -> Vec<GoalParticipation> {
    goals
        .iter()
        .filter_map(|goal| {
            let contributions = index.for_member_goal(user_id, goal.goal_id);
            if contributions.is_empty() {
                return None;
            }

            Some(GoalParticipation {
                goal_id: goal.goal_id,
                goal_name: goal.goal_name.clone(),
                status: goal.status,
                progress: goal.progress(),
                joined_at: earliest_submission(contributions)
                    .unwrap_or_else(|| goal.start_date.clone()),
            })
        })
        .collect()
}

/// Raw timestamp of the earliest parseable submission
fn earliest_submission(contributions: &[&ContributionRecord]) -> Option<String> {
    contributions
        .iter()
        .filter_map(|c| parse_timestamp(&c.submitted_at).map(|ts| (ts, &c.submitted_at)))
        .min_by_key(|(ts, _)| *ts)
        .map(|(_, raw)| raw.clone())
}

pub fn loans_for_member(user_id: i64, loans: &[LoanRecord]) -> Vec<&LoanRecord> {
    loans.iter().filter(|l| l.user_id == user_id).collect()
}
