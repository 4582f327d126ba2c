use chrono::NaiveDate;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use shared_types::MemberSummary;

pub const EXPORT_HEADERS: [&str; 8] = [
    "Name",
    "Email",
    "Phone",
    "Total Contributed",
    "Contributions",
    "Goals Joined",
    "Active Loans",
    "Member Since",
];

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to flush CSV buffer: {0}")]
    Flush(String),

    #[error("CSV output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Serialized report plus the name it should be downloaded as
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub filename: String,
    pub content: String,
}

pub fn export_filename(today: NaiveDate) -> String {
    format!("community-report-{}.csv", today.format("%Y-%m-%d"))
}

/// Writes the displayed rows in display order. Every field is quoted and
/// embedded quotes are doubled.
pub fn export_csv(rows: &[&MemberSummary], today: NaiveDate) -> Result<CsvExport, ExportError> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(EXPORT_HEADERS)?;

    for member in rows {
        writer.write_record([
            member.name.as_str(),
            member.email.as_str(),
            member.phone_number.as_deref().unwrap_or(""),
            &format!("{:.2}", member.total_contributed),
            &member.contribution_count.to_string(),
            &member.goals_joined.to_string(),
            if member.has_active_loans { "Yes" } else { "No" },
            member.member_since.as_str(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Flush(e.error().to_string()))?;

    Ok(CsvExport {
        filename: export_filename(today),
        content: String::from_utf8(bytes)?,
    })
}
