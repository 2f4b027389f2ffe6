//! Run orchestration: acquire content, build the document, write it, open it.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use tracing::{debug, info};

use crate::config::Config;
use crate::error::Result;
use crate::fonts::FontRegistry;
use crate::input;
use crate::layout::DocumentPlan;
use crate::open::{Opener, SystemOpener};
use crate::render::PdfCanvas;

/// Outcome of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub output: PathBuf,
    pub bytes_written: usize,
    /// Content units drawn into the document
    pub units_rendered: usize,
    /// Named inputs that could not be read
    pub files_skipped: usize,
    /// A viewer was launched for the output
    pub opened: bool,
}

/// Text-to-PDF converter holding the font registry and viewer collaborator
pub struct Converter {
    registry: FontRegistry,
    opener: Box<dyn Opener>,
}

impl Converter {
    pub fn new(registry: FontRegistry, opener: Box<dyn Opener>) -> Self {
        Self { registry, opener }
    }

    /// Converter searching the configured font dirs and using the system viewer
    pub fn for_config(config: &Config) -> Self {
        Self::new(
            FontRegistry::new(&config.settings.font_dirs),
            Box::new(SystemOpener),
        )
    }

    /// Convert the configured inputs (or `stdin`) into the configured output.
    ///
    /// Unreadable named files are reported on `stderr` and skipped. Any other
    /// failure stops the run before the open step.
    pub fn run<R, O, E>(
        &mut self,
        config: &Config,
        stdin: R,
        stdout: &mut O,
        stderr: &mut E,
    ) -> Result<RunReport>
    where
        R: BufRead,
        O: Write,
        E: Write,
    {
        if config.reads_stdin() {
            debug!("No input files given, reading stdin");
        }
        let acquired = input::acquire(&config.input_files, stdin)?;
        for failure in &acquired.failures {
            let _ = writeln!(stderr, "{}", failure);
        }

        let plan = DocumentPlan::new(config, &acquired.units);
        info!(
            "Laying out {} content units ({} blocks)",
            plan.body_count(),
            plan.blocks.len()
        );

        let mut canvas = PdfCanvas::new(&plan, &config.settings, &mut self.registry)?;
        canvas.write_pages(&plan);
        let bytes_written = canvas.finalize(&config.output)?;

        let _ = writeln!(stdout, "PDF created: {}", config.output.display());

        let mut opened = false;
        if config.open_after_write {
            let _ = writeln!(stdout, "Opening PDF file: {}", config.output.display());
            match self.opener.open(&config.output) {
                Ok(()) => opened = true,
                Err(e) => {
                    debug!("Viewer launch failed: {:?}", e);
                    let _ = writeln!(stderr, "{}", e);
                }
            }
        }

        Ok(RunReport {
            output: config.output.clone(),
            bytes_written,
            units_rendered: plan.body_count(),
            files_skipped: acquired.failures.len(),
            opened,
        })
    }
}
