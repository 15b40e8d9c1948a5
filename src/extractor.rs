/*!
 * One-pass extraction pipeline: scan, read content, compose, write
 */

use std::sync::Arc;
use std::time::Instant;

use indicatif::ProgressBar;
use log::info;

use crate::assembler::{Assembly, ContentAssembler};
use crate::classifier::FileClassifier;
use crate::config::Config;
use crate::error::Result;
use crate::scanner::Scanner;
use crate::tokenizer::{create_tokenizer, Tokenizer};
use crate::types::ScanResult;
use crate::writer::{Report, ReportWriter};

/// Everything a finished run produced
#[derive(Debug, Clone)]
pub struct Extraction {
    pub scan: ScanResult,
    pub assembly: Assembly,
    pub report: Report,
}

/// Runs the pipeline stages for one configuration
pub struct Extractor {
    scanner: Scanner,
    assembler: ContentAssembler,
    writer: ReportWriter,
    tokenizer: Box<dyn Tokenizer>,
}

impl Extractor {
    /// Build an extractor with the tokenizer selected by the configuration
    pub fn new(config: Config, progress: Arc<ProgressBar>) -> Result<Self> {
        let tokenizer = create_tokenizer(config.model);
        Self::with_tokenizer(config, progress, tokenizer)
    }

    /// Build an extractor with an explicit token counter
    pub fn with_tokenizer(
        config: Config,
        progress: Arc<ProgressBar>,
        tokenizer: Box<dyn Tokenizer>,
    ) -> Result<Self> {
        let classifier = FileClassifier::new(config.max_file_size, config.encodings.clone());
        Ok(Self {
            scanner: Scanner::new(config.clone(), Arc::clone(&progress))?,
            assembler: ContentAssembler::new(classifier, progress),
            writer: ReportWriter::new(config),
            tokenizer,
        })
    }

    /// Token counter in use
    pub fn tokenizer(&self) -> &dyn Tokenizer {
        self.tokenizer.as_ref()
    }

    /// Walk the tree
    pub fn scan(&self) -> Result<ScanResult> {
        let start = Instant::now();
        let scan = self.scanner.scan()?;
        info!(
            "Scan found {} files in {:.2?}",
            scan.files().count(),
            start.elapsed()
        );
        Ok(scan)
    }

    /// Read and render content for the selected files
    pub fn assemble(&self, scan: &mut ScanResult) -> Assembly {
        let start = Instant::now();
        let assembly = self.assembler.assemble(scan);
        info!(
            "Rendered {} content sections ({} skipped) in {:.2?}",
            assembly.sections.len(),
            assembly.skipped.len(),
            start.elapsed()
        );
        assembly
    }

    /// Compose the artifact and count its tokens
    pub fn compose(&self, scan: &ScanResult, assembly: &Assembly) -> Report {
        self.writer.compose(scan, assembly, self.tokenizer.as_ref())
    }

    /// Write the artifact to disk
    pub fn write(&self, report: &Report) -> Result<()> {
        self.writer.write(report)
    }

    /// Run every stage in order
    pub fn run(&self) -> Result<Extraction> {
        let mut scan = self.scan()?;
        let assembly = self.assemble(&mut scan);
        let report = self.compose(&scan, &assembly);
        self.write(&report)?;

        Ok(Extraction {
            scan,
            assembly,
            report,
        })
    }
}
