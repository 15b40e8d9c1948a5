/*!
 * Text artifact composition and output
 */

use std::fs::File;
use std::io::{BufWriter, Write};

use crate::assembler::Assembly;
use crate::config::Config;
use crate::error::{ExtractError, Result};
use crate::tokenizer::{count_or_estimate, Tokenizer};
use crate::types::{DirectoryNode, Node, ScanResult};

/// Composed output, ready to be written
#[derive(Debug, Clone)]
pub struct Report {
    /// Token count of the body (everything after the header line)
    pub token_count: usize,
    /// Counting method, `None` for the whitespace estimate
    pub token_method: Option<&'static str>,
    /// Every listed file, in traversal order
    pub listed_files: Vec<String>,
    /// Files that got a content section, in traversal order
    pub content_files: Vec<String>,
    /// Full artifact text
    pub text: String,
}

/// Composes and writes the text artifact
pub struct ReportWriter {
    /// Writer configuration
    config: Config,
}

impl ReportWriter {
    /// Create a new report writer
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Assemble the artifact. The token count covers the whole body, the
    /// header line itself is not counted.
    pub fn compose(
        &self,
        scan: &ScanResult,
        assembly: &Assembly,
        tokenizer: &dyn Tokenizer,
    ) -> Report {
        let listed_files: Vec<String> = scan.files().map(|e| e.rel_path.clone()).collect();
        let content_files: Vec<String> = assembly.content_paths().map(str::to_string).collect();

        let mut body = String::new();

        if let Some(includes) = &self.config.include_patterns {
            body.push_str(&format!(
                "Note: Only selected files are included with content. Inclusion patterns: {}\n\n",
                includes.display()
            ));
        }

        body.push_str("Directory Structure:\n\n");
        body.push_str(&render_tree(&scan.root));
        body.push('\n');

        body.push_str("All Files (Structure Only):\n\n");
        for path in &listed_files {
            body.push_str(&format!("- {}\n", path));
        }

        body.push_str("\nFiles With Content Included:\n\n");
        for path in &content_files {
            body.push_str(&format!("- {}\n", path));
        }
        body.push('\n');

        for section in &assembly.sections {
            section.render(&mut body);
        }

        let token_count = count_or_estimate(tokenizer, &body).tokens;
        let token_method = tokenizer.method();

        let header = match token_method {
            Some(method) => format!("Total Tokens: {} ({})\n\n", token_count, method),
            None => format!("Total Tokens: {}\n\n", token_count),
        };

        let mut text = String::with_capacity(header.len() + body.len());
        text.push_str(&header);
        text.push_str(&body);

        Report {
            token_count,
            token_method,
            listed_files,
            content_files,
            text,
        }
    }

    /// Write the artifact to the configured output path
    pub fn write(&self, report: &Report) -> Result<()> {
        let file = File::create(&self.config.output_file).map_err(|e| {
            ExtractError::OutputUnwritable(format!("{}: {}", self.config.output_file.display(), e))
        })?;
        let mut writer = BufWriter::new(file);
        writer.write_all(report.text.as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}

/// Draw the children of `root` with box-drawing connectors, one line each,
/// every line newline-terminated
pub fn render_tree(root: &DirectoryNode) -> String {
    let mut out = String::new();
    render_level(&root.contents, "", &mut out);
    out
}

fn render_level(nodes: &[Node], prefix: &str, out: &mut String) {
    for (i, node) in nodes.iter().enumerate() {
        let is_last = i + 1 == nodes.len();
        let connector = if is_last { "└── " } else { "├── " };
        out.push_str(prefix);
        out.push_str(connector);
        out.push_str(node.name());
        out.push('\n');

        if let Node::Directory(dir) = node {
            let next_prefix = format!("{}{}", prefix, if is_last { "    " } else { "│   " });
            render_level(&dir.contents, &next_prefix, out);
        }
    }
}
