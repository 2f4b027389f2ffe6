//! Content acquisition from named files or standard input.

use std::fs;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{PdfPipeError, Result};

/// Where a content unit came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentSource {
    File(PathBuf),
    Stdin,
}

impl std::fmt::Display for ContentSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentSource::File(path) => write!(f, "{}", path.display()),
            ContentSource::Stdin => write!(f, "stdin"),
        }
    }
}

/// One block of raw text destined for the document body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentUnit {
    pub source: ContentSource,
    pub text: String,
}

/// Units that were read plus the per-file failures that were skipped
#[derive(Debug, Default)]
pub struct Acquired {
    pub units: Vec<ContentUnit>,
    pub failures: Vec<PdfPipeError>,
}

/// Read every named file in order, skipping the ones that fail
pub fn read_files<P: AsRef<Path>>(paths: &[P]) -> Acquired {
    let mut acquired = Acquired::default();

    for path in paths {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(text) => {
                debug!("Read {} bytes from {}", text.len(), path.display());
                acquired.units.push(ContentUnit {
                    source: ContentSource::File(path.to_path_buf()),
                    text,
                });
            }
            Err(source) => {
                debug!("Skipping unreadable input {}: {}", path.display(), source);
                acquired.failures.push(PdfPipeError::FileRead {
                    path: path.to_path_buf(),
                    source,
                });
            }
        }
    }

    info!(
        "Acquired {} of {} input files",
        acquired.units.len(),
        paths.len()
    );
    acquired
}

/// Read a stream line by line into a single unit, each line newline-terminated
pub fn read_stdin<R: BufRead>(reader: R) -> Result<ContentUnit> {
    let mut text = String::new();

    for line in reader.lines() {
        let line = line.map_err(PdfPipeError::StdinRead)?;
        text.push_str(&line);
        text.push('\n');
    }

    debug!("Read {} bytes from stdin", text.len());
    Ok(ContentUnit {
        source: ContentSource::Stdin,
        text,
    })
}

/// Produce the content for a run: named files when any are given, otherwise stdin
pub fn acquire<R: BufRead>(input_files: &[PathBuf], stdin: R) -> Result<Acquired> {
    if input_files.is_empty() {
        let unit = read_stdin(stdin)?;
        Ok(Acquired {
            units: vec![unit],
            failures: Vec::new(),
        })
    } else {
        Ok(read_files(input_files))
    }
}
