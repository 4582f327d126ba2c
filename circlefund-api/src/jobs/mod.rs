pub mod report_manager;

pub use report_manager::{RefreshOutcome, ReportManager, ReportSnapshot, ReportTimings};
