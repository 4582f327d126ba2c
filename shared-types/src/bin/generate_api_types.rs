use shared_types::*;
use std::fs;
use std::path::Path;
use ts_rs::TS;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Generate TypeScript definitions for API types
    let mut types = Vec::new();

    // Upstream record types
    types.push(clean_type(UserRecord::export_to_string()?));
    types.push(clean_type(GoalStatus::export_to_string()?));
    types.push(clean_type(GoalRecord::export_to_string()?));
    types.push(clean_type(ContributionStatus::export_to_string()?));
    types.push(clean_type(ContributionRecord::export_to_string()?));
    types.push(clean_type(LoanStatus::export_to_string()?));
    types.push(clean_type(LoanRecord::export_to_string()?));

    // General report types
    types.push(clean_type(GoalParticipation::export_to_string()?));
    types.push(clean_type(MemberContribution::export_to_string()?));
    types.push(clean_type(MemberLoan::export_to_string()?));
    types.push(clean_type(MemberSummary::export_to_string()?));
    types.push(clean_type(SortKey::export_to_string()?));
    types.push(clean_type(SortOrder::export_to_string()?));
    types.push(clean_type(DataSource::export_to_string()?));
    types.push(clean_type(EmptyState::export_to_string()?));
    types.push(clean_type(ReportTotals::export_to_string()?));
    types.push(clean_type(GeneralReportQuery::export_to_string()?));
    types.push(clean_type(GeneralReportResponse::export_to_string()?));
    types.push(clean_type(ReportStatusResponse::export_to_string()?));

    // Settings types
    types.push(clean_type(SettingsResponse::export_to_string()?));

    let output = format!(
        "// Generated by shared-types/src/bin/generate_api_types.rs. Do not edit by hand.\n\n{}",
        types.join("\n")
    );

    let out_dir = Path::new("gui/src/api-types");
    fs::create_dir_all(out_dir)?;
    let out_path = out_dir.join("types.ts");
    fs::write(&out_path, output)?;

    println!("Generated TypeScript types at {}", out_path.display());

    Ok(())
}

fn clean_type(type_def: String) -> String {
    // Each export is concatenated into one file, so per-type imports are dropped
    let filtered: Vec<&str> = type_def
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with("import type")
                && !trimmed.starts_with("// This file was generated")
                && !trimmed.starts_with("/* This file was generated")
        })
        .collect();

    let result = filtered.join("\n").trim().to_string();
    if result.is_empty() {
        result
    } else {
        format!("{}\n", result)
    }
}
