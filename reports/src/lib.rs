//! Reports Crate
//!
//! Read-side derivation layer for the admin dashboard. Given the four upstream
//! collections (members, goals, contributions, loans) it builds per-member
//! activity summaries and turns them into ranked, filtered and exportable views.
//!
//! # Pipeline
//!
//! - **Join**: index contributions by member and goal, derive goal participations
//! - **Aggregate**: reduce each member's records into a `MemberSummary`
//! - **Rank**: favorites-first default order or a user-selected sort
//! - **View**: free-text search, result cap, totals and empty-state detection
//! - **Export**: quoted CSV payload with a dated filename
//!
//! Nothing here performs I/O; fetching lives in the API crate.
//!
//! # Example
//!
//! ```rust,ignore
//! use reports::{build_member_summaries, render_view, RankMode, SourceCollections, ViewFilter};
//!
//! let members = build_member_summaries(&sources)?;
//! let view = render_view(&members, RankMode::Default, &ViewFilter::default());
//! ```

pub mod date_parser;
pub mod general_report;

pub use general_report::{
    build_member_summaries, export_csv, export_filename, render_view, CsvExport, ExportError,
    RankMode, ReportView, SourceCollections, ViewFilter,
};
