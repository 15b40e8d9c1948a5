/*!
 * Console summary of an extraction run
 *
 * Uses the tabled library for clean, consistent table rendering.
 */

use std::time::Duration;

use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::extractor::Extraction;
use crate::utils::{format_file_size, format_number, truncate_path};

/// Information about a file in the report
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileReportInfo {
    /// Relative path
    pub path: String,
    /// Number of lines in the file
    pub lines: usize,
    /// Number of characters in the file
    pub chars: usize,
}

/// Statistics for an extraction run
#[derive(Debug, Clone)]
pub struct ScanReport {
    /// Output file path
    pub output_file: String,
    /// Time taken for scan and write
    pub duration: Duration,
    /// Number of files in the structure listing
    pub files_listed: usize,
    /// Number of directories in the tree
    pub directories: usize,
    /// Number of entries pruned by exclusion
    pub excluded: usize,
    /// Number of files with rendered content
    pub files_with_content: usize,
    /// Total size of listed files in bytes
    pub total_size: u64,
    /// Total size of files with rendered content in bytes
    pub content_size: u64,
    /// Total number of lines in rendered content
    pub total_lines: usize,
    /// Token count from the artifact header
    pub total_tokens: usize,
    /// Counting method, `None` for the whitespace estimate
    pub token_method: Option<&'static str>,
    /// Model context window, if a model was selected
    pub context_window: Option<usize>,
    /// Files whose content was skipped, with the reason
    pub skipped: Vec<(String, String)>,
    /// Details for each rendered file
    pub file_details: Vec<FileReportInfo>,
}

impl ScanReport {
    /// Collect statistics from a finished run
    pub fn from_extraction(
        extraction: &Extraction,
        output_file: String,
        duration: Duration,
        context_window: Option<usize>,
    ) -> Self {
        let scan = &extraction.scan;
        let file_details: Vec<FileReportInfo> = extraction
            .assembly
            .sections
            .iter()
            .map(|section| FileReportInfo {
                path: section.rel_path.clone(),
                lines: section.lines(),
                chars: section.chars(),
            })
            .collect();

        Self {
            output_file,
            duration,
            files_listed: scan.files().count(),
            directories: scan.directory_count(),
            excluded: scan.excluded.len(),
            files_with_content: extraction.assembly.sections.len(),
            total_size: scan.files().map(|e| e.size_bytes).sum(),
            content_size: scan.content_files().map(|e| e.size_bytes).sum(),
            total_lines: file_details.iter().map(|f| f.lines).sum(),
            total_tokens: extraction.report.token_count,
            token_method: extraction.report.token_method,
            context_window,
            skipped: extraction
                .assembly
                .skipped
                .iter()
                .map(|s| (s.rel_path.clone(), s.reason.to_string()))
                .collect(),
            file_details,
        }
    }
}

/// Format of the report output
pub enum ReportFormat {
    /// Console table output
    ConsoleTable,
}

/// Report generator for run results
pub struct Reporter {
    format: ReportFormat,
}

impl Reporter {
    /// Create a new reporter
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    /// Generate a report string based on run statistics
    pub fn generate_report(&self, report: &ScanReport) -> String {
        match self.format {
            ReportFormat::ConsoleTable => self.generate_console_report(report),
        }
    }

    /// Print the report to stdout
    pub fn print_report(&self, report: &ScanReport) {
        println!("\n{}", self.generate_report(report));
    }

    fn styled(rows: Table) -> String {
        let mut table = rows;
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));
        table.to_string()
    }

    // Create a summary table using the tabled crate
    fn create_summary_table(&self, report: &ScanReport) -> String {
        #[derive(Tabled)]
        struct SummaryRow {
            #[tabled(rename = "Metric")]
            key: String,

            #[tabled(rename = "Value")]
            value: String,
        }

        let mut rows = vec![
            SummaryRow {
                key: "📂 Output File".to_string(),
                value: report.output_file.clone(),
            },
            SummaryRow {
                key: "⏱️ Process Time".to_string(),
                value: format!("{:.4?}", report.duration),
            },
            SummaryRow {
                key: "🌳 Files Listed".to_string(),
                value: format!(
                    "{} in {} directories ({})",
                    format_number(report.files_listed),
                    format_number(report.directories),
                    format_file_size(report.total_size)
                ),
            },
            SummaryRow {
                key: "📄 Files With Content".to_string(),
                value: format!(
                    "{} ({})",
                    format_number(report.files_with_content),
                    format_file_size(report.content_size)
                ),
            },
            SummaryRow {
                key: "🚫 Excluded Entries".to_string(),
                value: format_number(report.excluded),
            },
            SummaryRow {
                key: "📝 Total Lines".to_string(),
                value: format_number(report.total_lines),
            },
        ];

        let token_text = match report.token_method {
            Some(method) => format!("{} tokens ({})", format_number(report.total_tokens), method),
            None => format!("{} tokens (estimated)", format_number(report.total_tokens)),
        };
        rows.push(SummaryRow {
            key: "📦 LLM Tokens".to_string(),
            value: token_text,
        });

        if let Some(window) = report.context_window.filter(|w| *w > 0) {
            let share = report.total_tokens as f64 / window as f64 * 100.0;
            rows.push(SummaryRow {
                key: "🧠 Context Window".to_string(),
                value: format!("{:.1}% of {}", share, format_number(window)),
            });
        }

        if !report.skipped.is_empty() {
            rows.push(SummaryRow {
                key: "⚠️ Content Skipped".to_string(),
                value: format_number(report.skipped.len()),
            });
        }

        Self::styled(Table::new(rows))
    }

    // Create a files table using the tabled crate
    fn create_files_table(&self, report: &ScanReport) -> String {
        #[derive(Tabled)]
        struct FileRow {
            #[tabled(rename = "File Path")]
            path: String,

            #[tabled(rename = "Lines")]
            lines: String,

            #[tabled(rename = "Chars")]
            chars: String,
        }

        // Sort files by character count
        let mut files: Vec<_> = report.file_details.iter().collect();
        files.sort_by(|a, b| b.chars.cmp(&a.chars).then_with(|| a.path.cmp(&b.path)));

        let rows: Vec<FileRow> = files
            .iter()
            .take(10)
            .map(|info| FileRow {
                path: truncate_path(&info.path, 60),
                lines: format_number(info.lines),
                chars: format_number(info.chars),
            })
            .collect();

        Self::styled(Table::new(rows))
    }

    fn create_skipped_table(&self, report: &ScanReport) -> String {
        #[derive(Tabled)]
        struct SkippedRow {
            #[tabled(rename = "File Path")]
            path: String,

            #[tabled(rename = "Reason")]
            reason: String,
        }

        let rows: Vec<SkippedRow> = report
            .skipped
            .iter()
            .map(|(path, reason)| SkippedRow {
                path: truncate_path(path, 60),
                reason: reason.clone(),
            })
            .collect();

        Self::styled(Table::new(rows))
    }

    // Generate a console table report
    fn generate_console_report(&self, report: &ScanReport) -> String {
        let mut sections = Vec::new();

        if !report.file_details.is_empty() {
            let files_title = if report.file_details.len() > 10 {
                "📋  TOP 10 LARGEST FILES BY CHARACTER COUNT  📋"
            } else {
                "📋  PROCESSED FILES"
            };
            sections.push(format!("{}\n{}", files_title, self.create_files_table(report)));
        }

        if !report.skipped.is_empty() {
            sections.push(format!(
                "⚠️  CONTENT SKIPPED\n{}",
                self.create_skipped_table(report)
            ));
        }

        sections.push(format!(
            "✅  EXTRACTION COMPLETE\n{}",
            self.create_summary_table(report)
        ));

        sections.join("\n\n")
    }
}
