use super::rank::{rank, RankMode};
use shared_types::{EmptyState, GeneralReportQuery, MemberSummary, ReportTotals};

/// Free-text search and result cap applied after ranking
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewFilter {
    query: String,
    limit: Option<usize>,
}

impl ViewFilter {
    /// A `limit` of zero means no cap, same as `None`
    pub fn new(query: impl Into<String>, limit: Option<usize>) -> Self {
        Self {
            query: query.into().to_lowercase(),
            limit: limit.filter(|l| *l > 0),
        }
    }

    /// Case-insensitive substring match on name, email or phone
    pub fn matches(&self, member: &MemberSummary) -> bool {
        if self.query.is_empty() {
            return true;
        }

        member.name.to_lowercase().contains(&self.query)
            || member.email.to_lowercase().contains(&self.query)
            || member
                .phone_number
                .as_ref()
                .is_some_and(|phone| phone.to_lowercase().contains(&self.query))
    }

    pub fn apply<'a>(&self, ranked: Vec<&'a MemberSummary>) -> Vec<&'a MemberSummary> {
        let filtered = ranked.into_iter().filter(|m| self.matches(m));

        match self.limit {
            Some(limit) => filtered.take(limit).collect(),
            None => filtered.collect(),
        }
    }
}

impl From<&GeneralReportQuery> for ViewFilter {
    fn from(query: &GeneralReportQuery) -> Self {
        ViewFilter::new(query.search.clone().unwrap_or_default(), query.limit)
    }
}

/// What the member table shows for one set of selections
#[derive(Debug, Clone)]
pub struct ReportView<'a> {
    pub rows: Vec<&'a MemberSummary>,
    pub totals: ReportTotals,
    pub empty_state: Option<EmptyState>,
}

impl ReportView<'_> {
    pub fn owned_rows(&self) -> Vec<MemberSummary> {
        self.rows.iter().map(|m| (*m).clone()).collect()
    }
}

pub fn render_view<'a>(
    members: &'a [MemberSummary],
    mode: RankMode,
    filter: &ViewFilter,
) -> ReportView<'a> {
    let rows = filter.apply(rank(members, mode));

    ReportView {
        totals: totals(&rows),
        empty_state: empty_state(members.len(), rows.len()),
        rows,
    }
}

pub fn totals(rows: &[&MemberSummary]) -> ReportTotals {
    ReportTotals {
        total_members: rows.len(),
        total_contributed: rows.iter().map(|m| m.total_contributed).sum(),
        total_contributions: rows.iter().map(|m| m.contribution_count).sum(),
        favorite_members: rows.iter().filter(|m| m.is_favorite).count(),
    }
}

pub fn empty_state(total_members: usize, shown: usize) -> Option<EmptyState> {
    if total_members == 0 {
        Some(EmptyState::NoMembers)
    } else if shown == 0 {
        Some(EmptyState::NoMatches)
    } else {
        None
    }
}
