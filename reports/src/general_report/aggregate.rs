use crate::date_parser::format_member_since;
use shared_types::{
    ContributionRecord, GoalParticipation, LoanRecord, MemberContribution, MemberLoan,
    MemberSummary, UserRecord,
};

/// Contribution count at which a member counts as a favorite
pub const FAVORITE_MIN_CONTRIBUTIONS: usize = 5;
/// Approved total at which a member counts as a favorite
pub const FAVORITE_MIN_TOTAL: f64 = 1000.0;

pub fn is_favorite(contribution_count: usize, total_contributed: f64) -> bool {
    contribution_count >= FAVORITE_MIN_CONTRIBUTIONS || total_contributed >= FAVORITE_MIN_TOTAL
}

/// Reduces one member's joined records into a summary. Input order is kept
/// for the contribution and loan lists; empty inputs yield zero/false.
pub fn summarize_member(
    user: &UserRecord,
    contributions: &[&ContributionRecord],
    goals: Vec<GoalParticipation>,
    loans: &[&LoanRecord],
) -> MemberSummary {
    let total_contributed: f64 = contributions
        .iter()
        .filter(|c| c.is_approved())
        .map(|c| c.amount)
        .sum();
    let contribution_count = contributions.len();
    let goals_joined = goals.len();
    let has_active_loans = loans.iter().any(|l| l.is_active());

    MemberSummary {
        user_id: user.user_id,
        name: user.display_name(),
        email: user.email.clone(),
        phone_number: user.phone_number.clone(),
        role: user.role.clone(),
        member_since: format_member_since(&user.created_at),
        profile_picture_url: user.profile_picture_url.clone(),
        contributions: contributions
            .iter()
            .map(|c| MemberContribution {
                contribution_id: c.contribution_id,
                goal_id: c.goal_id,
                goal_name: c.goal_name.clone(),
                amount: c.amount,
                status: c.status,
                submitted_at: c.submitted_at.clone(),
            })
            .collect(),
        goals,
        loans: loans
            .iter()
            .map(|l| MemberLoan {
                loan_id: l.loan_id,
                principal_amount: l.principal_amount,
                status: l.status,
                requested_date: l.requested_date.clone(),
                remaining_amount: l.remaining_amount,
            })
            .collect(),
        total_contributed,
        contribution_count,
        goals_joined,
        has_active_loans,
        is_favorite: is_favorite(contribution_count, total_contributed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::general_report::fixtures::*;
    use shared_types::{ContributionStatus, LoanStatus};

    #[test]
    fn test_empty_inputs() {
        let member = user(5, "Dana", "Member");
        let summary = summarize_member(&member, &[], vec![], &[]);

        assert_eq!(summary.total_contributed, 0.0);
        assert_eq!(summary.contribution_count, 0);
        assert_eq!(summary.goals_joined, 0);
        assert!(!summary.has_active_loans);
        assert!(!summary.is_favorite);
        assert_eq!(summary.name, "Dana Test");
        assert_eq!(summary.member_since, "2024-01-15");
    }

    #[test]
    fn test_only_approved_amounts_are_totalled() {
        let member = user(5, "Dana", "Member");
        let records = vec![
            contribution(1, 5, 10, 300.0, ContributionStatus::Approved, "2024-01-01"),
            contribution(2, 5, 10, 700.0, ContributionStatus::Rejected, "2024-01-02"),
            contribution(3, 5, 10, 900.0, ContributionStatus::Pending, "2024-01-03"),
        ];
        let refs: Vec<&ContributionRecord> = records.iter().collect();

        let summary = summarize_member(&member, &refs, vec![], &[]);
        assert_eq!(summary.total_contributed, 300.0);
        assert_eq!(summary.contribution_count, 3);
        assert_eq!(summary.contributions.len(), 3);
        assert!(!summary.is_favorite);
    }

    #[test]
    fn test_favorite_thresholds_are_inclusive() {
        assert!(is_favorite(5, 0.0));
        assert!(!is_favorite(4, 999.99));
        assert!(is_favorite(0, 1000.0));
        assert!(is_favorite(1, 1000.01));
    }

    #[test]
    fn test_total_at_exact_threshold_is_favorite() {
        let member = user(5, "Dana", "Member");
        let records = vec![
            contribution(1, 5, 10, 400.0, ContributionStatus::Approved, "2024-01-01"),
            contribution(2, 5, 11, 600.0, ContributionStatus::Approved, "2024-01-02"),
        ];
        let refs: Vec<&ContributionRecord> = records.iter().collect();

        let summary = summarize_member(&member, &refs, vec![], &[]);
        assert_eq!(summary.total_contributed, 1000.0);
        assert!(summary.is_favorite);
    }

    #[test]
    fn test_active_loan_detection() {
        let member = user(5, "Dana", "Member");
        let records = vec![
            loan(1, 5, LoanStatus::Paid, 0.0),
            loan(2, 5, LoanStatus::Pending, 300.0),
        ];
        let refs: Vec<&LoanRecord> = records.iter().collect();
        let summary = summarize_member(&member, &[], vec![], &refs);
        assert!(!summary.has_active_loans);
        assert_eq!(summary.loans.len(), 2);

        let records = vec![loan(3, 5, LoanStatus::Approved, 0.5)];
        let refs: Vec<&LoanRecord> = records.iter().collect();
        let summary = summarize_member(&member, &[], vec![], &refs);
        assert!(summary.has_active_loans);
    }
}
