mod aggregate;
mod export;
mod join;
mod rank;
mod view;

pub use aggregate::{is_favorite, summarize_member, FAVORITE_MIN_CONTRIBUTIONS, FAVORITE_MIN_TOTAL};
pub use export::{export_csv, export_filename, CsvExport, ExportError, EXPORT_HEADERS};
pub use join::{goal_participations, loans_for_member, ContributionIndex};
pub use rank::{rank, sort_default, RankMode};
pub use view::{empty_state, render_view, totals, ReportView, ViewFilter};

use shared_types::{
    ContributionRecord, GoalRecord, LoanRecord, MemberSummary, ReportError, UserRecord,
};

/// One settled snapshot of the four upstream collections
#[derive(Debug, Clone, Default)]
pub struct SourceCollections {
    pub users: Vec<UserRecord>,
    pub goals: Vec<GoalRecord>,
    pub contributions: Vec<ContributionRecord>,
    pub loans: Vec<LoanRecord>,
}

impl SourceCollections {
    /// Rejects records that would make the derived totals meaningless
    pub fn validate(&self) -> Result<(), ReportError> {
        if let Some(c) = self
            .contributions
            .iter()
            .find(|c| !c.amount.is_finite() || c.amount < 0.0)
        {
            return Err(ReportError::Aggregation(format!(
                "contribution {} has invalid amount {}",
                c.contribution_id, c.amount
            )));
        }

        if let Some(l) = self
            .loans
            .iter()
            .find(|l| !l.remaining_amount.is_finite() || l.remaining_amount < 0.0)
        {
            return Err(ReportError::Aggregation(format!(
                "loan {} has invalid remaining amount {}",
                l.loan_id, l.remaining_amount
            )));
        }

        Ok(())
    }
}

/// Builds one summary per account with the member role, in default rank order
/// (favorites first, then by approved total descending).
pub fn build_member_summaries(
    sources: &SourceCollections,
) -> Result<Vec<MemberSummary>, ReportError> {
    sources.validate()?;

    let index = ContributionIndex::new(&sources.contributions);

    let mut summaries: Vec<MemberSummary> = sources
        .users
        .iter()
        .filter(|user| user.is_member())
        .map(|user| {
            let goals = goal_participations(user.user_id, &sources.goals, &index);
            let loans = loans_for_member(user.user_id, &sources.loans);
            summarize_member(user, index.for_member(user.user_id), goals, &loans)
        })
        .collect();

    sort_default(&mut summaries);

    Ok(summaries)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use shared_types::{
        ContributionRecord, ContributionStatus, GoalRecord, GoalStatus, LoanRecord, LoanStatus,
        MemberSummary, UserRecord,
    };

    pub fn user(user_id: i64, first_name: &str, role: &str) -> UserRecord {
        UserRecord {
            user_id,
            first_name: first_name.to_string(),
            last_name: "Test".to_string(),
            email: format!("{}@example.com", first_name.to_lowercase()),
            phone_number: None,
            role: role.to_string(),
            created_at: "2024-01-15T08:00:00Z".to_string(),
            profile_picture_url: None,
        }
    }

    pub fn goal(goal_id: i64, name: &str) -> GoalRecord {
        GoalRecord {
            goal_id,
            goal_name: name.to_string(),
            status: GoalStatus::Active,
            progress_percentage: Some(40.0),
            start_date: "2024-01-01".to_string(),
        }
    }

    pub fn contribution(
        contribution_id: i64,
        user_id: i64,
        goal_id: i64,
        amount: f64,
        status: ContributionStatus,
        submitted_at: &str,
    ) -> ContributionRecord {
        ContributionRecord {
            contribution_id,
            user_id,
            goal_id,
            goal_name: format!("Goal {}", goal_id),
            amount,
            status,
            submitted_at: submitted_at.to_string(),
        }
    }

    pub fn loan(loan_id: i64, user_id: i64, status: LoanStatus, remaining: f64) -> LoanRecord {
        LoanRecord {
            loan_id,
            user_id,
            principal_amount: 1000.0,
            status,
            requested_date: "2024-02-01".to_string(),
            remaining_amount: remaining,
        }
    }

    pub fn summary(user_id: i64, name: &str, total: f64, count: usize) -> MemberSummary {
        MemberSummary {
            user_id,
            name: name.to_string(),
            email: format!("member{}@example.com", user_id),
            phone_number: None,
            role: "Member".to_string(),
            member_since: "2024-01-15".to_string(),
            profile_picture_url: None,
            contributions: vec![],
            goals: vec![],
            loans: vec![],
            total_contributed: total,
            contribution_count: count,
            goals_joined: 0,
            has_active_loans: false,
            is_favorite: super::is_favorite(count, total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use shared_types::{ContributionStatus::*, LoanStatus};

    fn sources() -> SourceCollections {
        SourceCollections {
            users: vec![
                user(1, "Admin", "Admin"),
                user(2, "Amina", "Member"),
                user(3, "Brian", "Member"),
                user(4, "Chloe", "Member"),
            ],
            goals: vec![goal(10, "Land"), goal(11, "School"), goal(12, "Emergency")],
            contributions: vec![
                // Amina: 600 approved over two goals, one pending on a third
                contribution(100, 2, 10, 200.0, Approved, "2024-02-01T10:00:00Z"),
                contribution(101, 2, 10, 300.0, Approved, "2024-01-20T10:00:00Z"),
                contribution(102, 2, 11, 100.0, Approved, "2024-02-03T10:00:00Z"),
                contribution(103, 2, 12, 50.0, Pending, "2024-02-04T10:00:00Z"),
                // Brian: six small approved contributions to one goal
                contribution(200, 3, 11, 10.0, Approved, "2024-03-01T10:00:00Z"),
                contribution(201, 3, 11, 10.0, Approved, "2024-03-02T10:00:00Z"),
                contribution(202, 3, 11, 10.0, Approved, "2024-03-03T10:00:00Z"),
                contribution(203, 3, 11, 10.0, Approved, "2024-03-04T10:00:00Z"),
                contribution(204, 3, 11, 10.0, Approved, "2024-03-05T10:00:00Z"),
                contribution(205, 3, 11, 10.0, Approved, "2024-03-06T10:00:00Z"),
                // The admin's own contribution never shows up
                contribution(300, 1, 10, 5000.0, Approved, "2024-01-02T10:00:00Z"),
            ],
            loans: vec![
                loan(1, 2, LoanStatus::Approved, 250.0),
                loan(2, 4, LoanStatus::Approved, 0.0),
            ],
        }
    }

    fn find(summaries: &[MemberSummary], user_id: i64) -> &MemberSummary {
        summaries.iter().find(|s| s.user_id == user_id).unwrap()
    }

    #[test]
    fn test_only_members_are_summarized() {
        let summaries = build_member_summaries(&sources()).unwrap();
        assert_eq!(summaries.len(), 3);
        assert!(summaries.iter().all(|s| s.role == "Member"));
        assert!(summaries.iter().all(|s| s.user_id != 1));
    }

    #[test]
    fn test_member_with_mixed_statuses() {
        let summaries = build_member_summaries(&sources()).unwrap();
        let amina = find(&summaries, 2);

        assert_eq!(amina.total_contributed, 600.0);
        assert_eq!(amina.contribution_count, 4);
        assert_eq!(amina.goals_joined, 3);
        assert!(!amina.is_favorite);
        assert!(amina.has_active_loans);

        let land = amina.goals.iter().find(|g| g.goal_id == 10).unwrap();
        assert_eq!(land.joined_at, "2024-01-20T10:00:00Z");
    }

    #[test]
    fn test_frequent_small_contributor_is_favorite() {
        let summaries = build_member_summaries(&sources()).unwrap();
        let brian = find(&summaries, 3);

        assert_eq!(brian.total_contributed, 60.0);
        assert_eq!(brian.contribution_count, 6);
        assert_eq!(brian.goals_joined, 1);
        assert!(brian.is_favorite);
    }

    #[test]
    fn test_member_without_activity() {
        let summaries = build_member_summaries(&sources()).unwrap();
        let chloe = find(&summaries, 4);

        assert_eq!(chloe.contribution_count, 0);
        assert_eq!(chloe.goals_joined, 0);
        assert!(chloe.goals.is_empty());
        assert_eq!(chloe.loans.len(), 1);
        assert!(!chloe.has_active_loans);
    }

    #[test]
    fn test_default_order_is_favorites_first() {
        let summaries = build_member_summaries(&sources()).unwrap();
        let ids: Vec<i64> = summaries.iter().map(|s| s.user_id).collect();
        assert_eq!(ids, vec![3, 2, 4]);
    }

    #[test]
    fn test_missing_goals_source_isolated() {
        let mut sources = sources();
        sources.goals.clear();

        let summaries = build_member_summaries(&sources).unwrap();
        assert!(summaries.iter().all(|s| s.goals_joined == 0));

        let amina = find(&summaries, 2);
        assert!(amina.has_active_loans);
        assert_eq!(amina.total_contributed, 600.0);
    }

    #[test]
    fn test_negative_amount_is_rejected() {
        let mut sources = sources();
        sources.contributions[0].amount = -5.0;

        let err = build_member_summaries(&sources).unwrap_err();
        assert!(matches!(err, ReportError::Aggregation(_)));
    }

    #[test]
    fn test_empty_sources() {
        let summaries = build_member_summaries(&SourceCollections::default()).unwrap();
        assert!(summaries.is_empty());
    }
}
