//! Spreadsheet reports: the five-sheet match report and the bulk summary.
//!
//! Builders return an in-memory `Workbook`; callers decide whether to save it
//! to disk or to a buffer.

use rust_xlsxwriter::{Color, Format, FormatAlign, Workbook, Worksheet, XlsxError};
use serde::Serialize;

use crate::models::job::JobMatch;
use crate::models::resume::BulkOutcome;

const BRAND_GREEN: u32 = 0x2E7D32;
const TOOLS_BLUE: u32 = 0x1565C0;
const SECTION_BLUE: u32 = 0x1976D2;

const EXCELLENT_FILL: u32 = 0xC8E6C9;
const GOOD_FILL: u32 = 0xFFF9C4;
const FAIR_FILL: u32 = 0xFFCCBC;

const JOB_MATCH_HEADERS: [&str; 7] = [
    "#",
    "Job Title",
    "Company",
    "Location",
    "Match %",
    "Matching Skills",
    "Link",
];
const TOP_MATCH_HEADERS: [&str; 5] = ["Rank", "Job Title", "Company", "Match %", "Location"];
const BULK_HEADERS: [&str; 9] = [
    "#",
    "Filename",
    "Email",
    "Phone",
    "Skills",
    "Jobs Found",
    "Avg Match %",
    "Top Match %",
    "Status",
];

const TOP_MATCH_LIMIT: usize = 10;

pub const MACROS: &[(&str, &str)] = &[
    ("FilterByMatch", "Filters jobs by match percentage threshold"),
    ("SortByCompany", "Sorts job list alphabetically by company"),
    ("HighlightTopMatches", "Highlights jobs with >70% match in green"),
    ("ExportToCSV", "Exports current sheet to CSV format"),
    ("SendEmailReport", "Sends report via email with job summary"),
    ("GenerateChart", "Creates match distribution pie chart"),
    ("AutoFormat", "Auto-formats all sheets with professional styling"),
    ("RefreshData", "Refreshes job data from API"),
    ("CreatePivotTable", "Creates pivot table from job data"),
    ("ConditionalFormatting", "Applies conditional formatting to match %"),
];

pub const QUICK_ACTIONS: &[(&str, &str)] = &[
    ("Ctrl+Shift+F", "Open Filter Dialog"),
    ("Ctrl+Shift+S", "Sort by Match Score"),
    ("Ctrl+Shift+E", "Export Report"),
    ("Ctrl+Shift+R", "Refresh All Data"),
    ("Ctrl+Shift+C", "Create Summary Chart"),
];

pub const ANALYSIS_FEATURES: &[&str] = &[
    "Match Score Distribution Analysis",
    "Company Frequency Analysis",
    "Location-based Job Clustering",
    "Skill Gap Analysis",
    "Salary Range Estimation (if available)",
    "Job Market Trend Analysis",
];

// ────────────────────────────────────────────────────────────────────────────
// Inputs
// ────────────────────────────────────────────────────────────────────────────

/// Everything the match report needs about one resume.
#[derive(Debug, Clone)]
pub struct MatchReport {
    pub filename: String,
    pub email: String,
    pub phone: String,
    pub skills: Vec<String>,
    pub jobs: Vec<JobMatch>,
    /// Rendered on the dashboard as "Report Date".
    pub generated_at: String,
}

/// Counts of the automation placeholders embedded in the match report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VbaFeatures {
    pub macros_included: usize,
    pub quick_actions: usize,
    pub analysis_features: usize,
}

impl VbaFeatures {
    pub fn current() -> Self {
        Self {
            macros_included: MACROS.len(),
            quick_actions: QUICK_ACTIONS.len(),
            analysis_features: ANALYSIS_FEATURES.len(),
        }
    }
}

/// Excellent / good / fair / low counts for the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchDistribution {
    pub excellent: usize,
    pub good: usize,
    pub fair: usize,
    pub low: usize,
}

impl MatchDistribution {
    pub fn of(jobs: &[JobMatch]) -> Self {
        jobs.iter().fold(Self::default(), |mut acc, job| {
            match job.match_score {
                m if m >= 70.0 => acc.excellent += 1,
                m if m >= 50.0 => acc.good += 1,
                m if m >= 30.0 => acc.fair += 1,
                _ => acc.low += 1,
            }
            acc
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Formats
// ────────────────────────────────────────────────────────────────────────────

fn header_format(size: u8) -> Format {
    Format::new()
        .set_bold()
        .set_font_size(size)
        .set_font_color(Color::White)
        .set_background_color(Color::RGB(BRAND_GREEN))
}

fn banner_format(size: u8, font: u32) -> Format {
    Format::new()
        .set_bold()
        .set_font_size(size)
        .set_font_color(Color::RGB(font))
}

fn section_format(fill: u32, size: u8) -> Format {
    Format::new()
        .set_bold()
        .set_font_size(size)
        .set_font_color(Color::White)
        .set_background_color(Color::RGB(fill))
}

fn match_fill(score: f64) -> Option<Format> {
    let fill = match score {
        s if s >= 70.0 => EXCELLENT_FILL,
        s if s >= 50.0 => GOOD_FILL,
        s if s >= 30.0 => FAIR_FILL,
        _ => return None,
    };
    Some(Format::new().set_background_color(Color::RGB(fill)))
}

fn write_header_row(
    sheet: &mut Worksheet,
    row: u32,
    headers: &[&str],
    format: &Format,
) -> Result<(), XlsxError> {
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string_with_format(row, col as u16, *header, format)?;
    }
    Ok(())
}

fn set_widths(sheet: &mut Worksheet, widths: &[f64]) -> Result<(), XlsxError> {
    for (col, width) in widths.iter().enumerate() {
        sheet.set_column_width(col as u16, *width)?;
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Match report
// ────────────────────────────────────────────────────────────────────────────

/// Builds the five-sheet report: Dashboard, Skills, Job Matches,
/// Top 10 Matches and VBA Automation Tools.
pub fn build_match_report(report: &MatchReport) -> Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();
    let header = header_format(14);

    write_dashboard(workbook.add_worksheet(), report, &header)?;
    write_skills(workbook.add_worksheet(), &report.skills, &header)?;
    write_job_matches(workbook.add_worksheet(), &report.jobs, &header)?;
    write_top_matches(workbook.add_worksheet(), &report.jobs, &header)?;
    write_automation_tools(workbook.add_worksheet())?;

    Ok(workbook)
}

fn write_dashboard(
    sheet: &mut Worksheet,
    report: &MatchReport,
    header: &Format,
) -> Result<(), XlsxError> {
    sheet.set_name("Dashboard")?;
    sheet.merge_range(
        0,
        0,
        0,
        3,
        "RESUME JOB MATCH REPORT",
        &banner_format(16, BRAND_GREEN),
    )?;

    sheet.merge_range(2, 0, 2, 3, "Resume Information", header)?;
    sheet.write_string(3, 0, "Filename:")?;
    sheet.write_string(3, 1, &report.filename)?;
    sheet.write_string(4, 0, "Email:")?;
    sheet.write_string(4, 1, &report.email)?;
    sheet.write_string(5, 0, "Phone:")?;
    sheet.write_string(5, 1, &report.phone)?;
    sheet.write_string(6, 0, "Skills Found:")?;
    sheet.write_number(6, 1, report.skills.len() as f64)?;
    sheet.write_string(7, 0, "Report Date:")?;
    sheet.write_string(7, 1, &report.generated_at)?;

    sheet.merge_range(9, 0, 9, 3, "Job Match Statistics", header)?;
    sheet.write_string(10, 0, "Total Jobs Found:")?;
    sheet.write_number(10, 1, report.jobs.len() as f64)?;

    if !report.jobs.is_empty() {
        let scores = report.jobs.iter().map(|j| j.match_score);
        let avg = scores.clone().sum::<f64>() / report.jobs.len() as f64;
        let top = scores.fold(f64::MIN, f64::max);

        sheet.write_string(11, 0, "Average Match:")?;
        sheet.write_string(11, 1, format!("{avg:.1}%"))?;
        sheet.write_string(12, 0, "Top Match:")?;
        sheet.write_string(12, 1, format!("{top:.1}%"))?;

        let dist = MatchDistribution::of(&report.jobs);
        sheet.merge_range(14, 0, 14, 3, "Match Distribution", header)?;
        let rows = [
            ("Excellent (70%+):", dist.excellent),
            ("Good (50-69%):", dist.good),
            ("Fair (30-49%):", dist.fair),
            ("Low (<30%):", dist.low),
        ];
        for (offset, (label, count)) in rows.into_iter().enumerate() {
            let row = 15 + offset as u32;
            sheet.write_string(row, 0, label)?;
            sheet.write_number(row, 1, count as f64)?;
        }
    }

    set_widths(sheet, &[20.0, 30.0])
}

fn write_skills(sheet: &mut Worksheet, skills: &[String], header: &Format) -> Result<(), XlsxError> {
    sheet.set_name("Skills")?;
    sheet.write_string_with_format(0, 0, "Detected Skills", header)?;
    for (idx, skill) in skills.iter().enumerate() {
        sheet.write_string(idx as u32 + 1, 0, skill)?;
    }
    set_widths(sheet, &[25.0])
}

fn write_job_matches(
    sheet: &mut Worksheet,
    jobs: &[JobMatch],
    header: &Format,
) -> Result<(), XlsxError> {
    sheet.set_name("Job Matches")?;
    let centered = header.clone().set_align(FormatAlign::Center);
    write_header_row(sheet, 0, &JOB_MATCH_HEADERS, &centered)?;

    for (idx, job) in jobs.iter().enumerate() {
        let row = idx as u32 + 1;
        sheet.write_number(row, 0, row)?;
        sheet.write_string(row, 1, &job.title)?;
        sheet.write_string(row, 2, &job.company)?;
        sheet.write_string(row, 3, &job.location)?;
        match match_fill(job.match_score) {
            Some(fill) => sheet.write_number_with_format(row, 4, job.match_score, &fill)?,
            None => sheet.write_number(row, 4, job.match_score)?,
        };
        sheet.write_string(row, 5, job.matching_skills.join(", "))?;
        sheet.write_string(row, 6, &job.link)?;
    }

    set_widths(sheet, &[5.0, 30.0, 25.0, 20.0, 10.0, 40.0, 50.0])
}

fn write_top_matches(
    sheet: &mut Worksheet,
    jobs: &[JobMatch],
    header: &Format,
) -> Result<(), XlsxError> {
    sheet.set_name("Top 10 Matches")?;
    sheet.merge_range(0, 0, 0, 4, "TOP 10 JOB MATCHES", &banner_format(14, BRAND_GREEN))?;
    write_header_row(sheet, 1, &TOP_MATCH_HEADERS, header)?;

    let mut ranked: Vec<&JobMatch> = jobs.iter().collect();
    ranked.sort_by(|a, b| b.match_score.total_cmp(&a.match_score));

    for (idx, job) in ranked.into_iter().take(TOP_MATCH_LIMIT).enumerate() {
        let row = idx as u32 + 2;
        sheet.write_number(row, 0, idx as u32 + 1)?;
        sheet.write_string(row, 1, &job.title)?;
        sheet.write_string(row, 2, &job.company)?;
        sheet.write_number(row, 3, job.match_score)?;
        sheet.write_string(row, 4, &job.location)?;
    }

    set_widths(sheet, &[8.0, 35.0, 25.0, 12.0, 20.0])
}

fn write_automation_tools(sheet: &mut Worksheet) -> Result<(), XlsxError> {
    sheet.set_name("VBA Automation Tools")?;
    sheet.merge_range(
        0,
        0,
        0,
        2,
        "VBA AUTOMATION TOOLS & MACROS",
        &section_format(TOOLS_BLUE, 14),
    )?;

    let section = section_format(SECTION_BLUE, 12);
    let macro_name = Format::new().set_bold().set_font_color(Color::RGB(TOOLS_BLUE));

    sheet.merge_range(2, 0, 2, 2, "Available Macros", &section)?;
    for (offset, (name, description)) in MACROS.iter().enumerate() {
        let row = 3 + offset as u32;
        sheet.write_string_with_format(row, 0, *name, &macro_name)?;
        sheet.write_string(row, 1, *description)?;
    }

    sheet.merge_range(15, 0, 15, 2, "Quick Actions", &section)?;
    for (offset, (shortcut, action)) in QUICK_ACTIONS.iter().enumerate() {
        let row = 16 + offset as u32;
        sheet.write_string(row, 0, *shortcut)?;
        sheet.write_string(row, 1, *action)?;
    }

    sheet.merge_range(23, 0, 23, 2, "Data Analysis Features", &section)?;
    for (offset, feature) in ANALYSIS_FEATURES.iter().enumerate() {
        sheet.write_string(24 + offset as u32, 0, format!("• {feature}"))?;
    }

    set_widths(sheet, &[25.0, 50.0])
}

// ────────────────────────────────────────────────────────────────────────────
// Bulk report
// ────────────────────────────────────────────────────────────────────────────

/// One "Bulk Processing Results" sheet, a row per processed file.
pub fn build_bulk_report(outcomes: &[BulkOutcome]) -> Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Bulk Processing Results")?;
    write_header_row(sheet, 0, &BULK_HEADERS, &header_format(12))?;

    for (idx, outcome) in outcomes.iter().enumerate() {
        let row = idx as u32 + 1;
        sheet.write_number(row, 0, row)?;
        sheet.write_string(row, 1, outcome.filename())?;

        match outcome {
            BulkOutcome::Processed(result) => {
                sheet.write_string(row, 2, result.email.as_deref().unwrap_or("N/A"))?;
                sheet.write_string(row, 3, result.phone.as_deref().unwrap_or("N/A"))?;
                sheet.write_number(row, 4, result.skills_count as f64)?;
                sheet.write_number(row, 5, result.jobs_found as f64)?;
                sheet.write_number(row, 6, result.avg_match)?;
                sheet.write_number(row, 7, result.top_match)?;
                sheet.write_string(row, 8, "Success")?;
            }
            BulkOutcome::Failed { .. } => {
                sheet.write_string(row, 2, "N/A")?;
                sheet.write_string(row, 3, "N/A")?;
                for col in 4..=7 {
                    sheet.write_number(row, col, 0)?;
                }
                sheet.write_string(row, 8, "Error")?;
            }
        }
    }

    set_widths(
        sheet,
        &[5.0, 30.0, 25.0, 15.0, 10.0, 12.0, 12.0, 12.0, 10.0],
    )?;
    Ok(workbook)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::BulkResult;
    use std::io::{Cursor, Read};

    fn job(title: &str, score: f64) -> JobMatch {
        JobMatch {
            title: title.to_string(),
            company: "Acme".to_string(),
            location: "Remote".to_string(),
            description: String::new(),
            match_score: score,
            matching_skills: vec!["python".to_string()],
            link: "https://example.com".to_string(),
            required_skills: vec!["python".to_string()],
        }
    }

    fn report(jobs: Vec<JobMatch>) -> MatchReport {
        MatchReport {
            filename: "cv.pdf".to_string(),
            email: "jane@example.com".to_string(),
            phone: "N/A".to_string(),
            skills: vec!["python".to_string(), "sql".to_string()],
            jobs,
            generated_at: "2024-01-01 12:00:00".to_string(),
        }
    }

    fn read_part(buffer: Vec<u8>, part: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(buffer)).unwrap();
        let mut xml = String::new();
        archive.by_name(part).unwrap().read_to_string(&mut xml).unwrap();
        xml
    }

    #[test]
    fn test_match_report_has_five_sheets_in_order() {
        let mut workbook = build_match_report(&report(vec![job("Dev", 80.0)])).unwrap();
        let xml = read_part(workbook.save_to_buffer().unwrap(), "xl/workbook.xml");

        let names = [
            "Dashboard",
            "Skills",
            "Job Matches",
            "Top 10 Matches",
            "VBA Automation Tools",
        ];
        let positions: Vec<usize> = names
            .iter()
            .map(|n| xml.find(&format!("name=\"{n}\"")).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_match_report_contains_dashboard_text() {
        let mut workbook =
            build_match_report(&report(vec![job("Dev", 80.0), job("Ops", 40.0)])).unwrap();
        let strings = read_part(workbook.save_to_buffer().unwrap(), "xl/sharedStrings.xml");

        assert!(strings.contains("RESUME JOB MATCH REPORT"));
        assert!(strings.contains("60.0%"));
        assert!(strings.contains("80.0%"));
        assert!(strings.contains("FilterByMatch"));
        assert!(strings.contains("Ctrl+Shift+C"));
    }

    #[test]
    fn test_empty_job_list_skips_statistics() {
        let mut workbook = build_match_report(&report(Vec::new())).unwrap();
        let strings = read_part(workbook.save_to_buffer().unwrap(), "xl/sharedStrings.xml");

        assert!(strings.contains("Total Jobs Found:"));
        assert!(!strings.contains("Average Match:"));
        assert!(!strings.contains("Match Distribution"));
    }

    #[test]
    fn test_distribution_buckets() {
        let jobs = vec![
            job("a", 70.0),
            job("b", 69.9),
            job("c", 50.0),
            job("d", 30.0),
            job("e", 29.9),
        ];
        assert_eq!(
            MatchDistribution::of(&jobs),
            MatchDistribution {
                excellent: 1,
                good: 2,
                fair: 1,
                low: 1
            }
        );
    }

    #[test]
    fn test_vba_feature_counts() {
        assert_eq!(
            VbaFeatures::current(),
            VbaFeatures {
                macros_included: 10,
                quick_actions: 5,
                analysis_features: 6
            }
        );
    }

    #[test]
    fn test_bulk_report_marks_status() {
        let outcomes = vec![
            BulkOutcome::Processed(BulkResult {
                filename: "ok.docx".to_string(),
                email: None,
                phone: None,
                skills_count: 2,
                skills: vec!["python".to_string(), "sql".to_string()],
                jobs_found: 1,
                avg_match: 50.0,
                top_match: 50.0,
                top_jobs: vec![job("Dev", 50.0)],
            }),
            BulkOutcome::Failed {
                filename: "broken.pdf".to_string(),
                error: "bad pdf".to_string(),
            },
        ];
        let mut workbook = build_bulk_report(&outcomes).unwrap();
        let buffer = workbook.save_to_buffer().unwrap();

        let xml = read_part(buffer.clone(), "xl/workbook.xml");
        assert!(xml.contains("name=\"Bulk Processing Results\""));

        let strings = read_part(buffer, "xl/sharedStrings.xml");
        assert!(strings.contains("Success"));
        assert!(strings.contains("Error"));
        assert!(strings.contains("broken.pdf"));
    }
}
