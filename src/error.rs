use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can stop or degrade a conversion run
#[derive(Error, Debug)]
pub enum PdfPipeError {
    /// Standard input could not be read; fatal for the run
    #[error("Error reading from stdin: {0}")]
    StdinRead(#[source] io::Error),

    /// One named input file could not be read; the run skips it
    #[error("Error reading file {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// No font files could be found for the requested family
    #[error("Error setting font: unsupported font: {name}")]
    UnsupportedFont { name: String },

    /// Font files were found but could not be parsed
    #[error("Error setting font: could not load '{name}' from {}: {reason}", path.display())]
    FontLoading {
        name: String,
        path: PathBuf,
        reason: String,
    },

    /// The PDF engine failed while laying out or serializing the document
    #[error("Error writing PDF: {0}")]
    Render(#[from] genpdf::error::Error),

    /// The serialized document could not be written to disk
    #[error("Error writing PDF {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The settings file is missing or malformed
    #[error("Invalid settings file {}: {reason}", path.display())]
    Settings { path: PathBuf, reason: String },

    /// The OS viewer could not be launched
    #[error("Error opening PDF file {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Convenience Result type with PdfPipeError
pub type Result<T> = std::result::Result<T, PdfPipeError>;
