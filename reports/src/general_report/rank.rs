use shared_types::{GeneralReportQuery, MemberSummary, SortKey, SortOrder};
use std::cmp::Ordering;

/// Which ordering policy the member table is in. The favorites-first order
/// only applies until the user picks a sort; it is never mixed with one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RankMode {
    #[default]
    Default,
    User { key: SortKey, order: SortOrder },
}

impl RankMode {
    pub fn user(key: SortKey, order: SortOrder) -> Self {
        RankMode::User { key, order }
    }
}

impl From<&GeneralReportQuery> for RankMode {
    /// A query without a sort key has not made a selection yet
    fn from(query: &GeneralReportQuery) -> Self {
        match query.sort_by {
            Some(key) => RankMode::user(key, query.sort_order.unwrap_or_default()),
            None => RankMode::Default,
        }
    }
}

/// Stable ordering of `members` under `mode`; full ties keep input order.
pub fn rank(members: &[MemberSummary], mode: RankMode) -> Vec<&MemberSummary> {
    let mut ranked: Vec<&MemberSummary> = members.iter().collect();

    match mode {
        RankMode::Default => ranked.sort_by(|a, b| default_order(a, b)),
        RankMode::User { key, order } => ranked.sort_by(|a, b| {
            let cmp = compare_by_key(a, b, key);
            match order {
                SortOrder::Ascending => cmp,
                SortOrder::Descending => cmp.reverse(),
            }
        }),
    }

    ranked
}

/// In-place favorites-first ordering applied when a report is built
pub fn sort_default(members: &mut [MemberSummary]) {
    members.sort_by(default_order);
}

fn default_order(a: &MemberSummary, b: &MemberSummary) -> Ordering {
    b.is_favorite
        .cmp(&a.is_favorite)
        .then_with(|| b.total_contributed.total_cmp(&a.total_contributed))
}

fn compare_by_key(a: &MemberSummary, b: &MemberSummary, key: SortKey) -> Ordering {
    match key {
        SortKey::Name => compare_names(&a.name, &b.name),
        SortKey::TotalContributed => a.total_contributed.total_cmp(&b.total_contributed),
        SortKey::ContributionCount => a.contribution_count.cmp(&b.contribution_count),
        SortKey::GoalsJoined => a.goals_joined.cmp(&b.goals_joined),
    }
}

/// Case-insensitive first so "amina" and "Amina" sort together
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
