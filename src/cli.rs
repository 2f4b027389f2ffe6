use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::PaperSize;

/// CLI arguments for pdfpipe
#[derive(Parser, Debug, Clone)]
#[command(
    name = "pdfpipe",
    version,
    about = "Create a PDF file quickly from some text",
    long_about = "
Create a PDF file quickly from some text.

Text is read from the files named with --input-files, or from standard input
when no files are given.

EXAMPLES:
    cat notes.txt | pdfpipe -o notes.pdf
    pdfpipe --input-files a.txt,b.txt -b -n -t \"Both files\"
    pdfpipe --input-files letter.txt -p -g Letter -x
"
)]
pub struct CliArgs {
    /// A title string for the document
    #[arg(short = 't', long = "title", default_value = "")]
    pub title: String,

    /// Paper size
    #[arg(
        short = 'g',
        long = "paper",
        value_enum,
        ignore_case = true,
        default_value_t = PaperSize::A4
    )]
    pub paper: PaperSize,

    /// Add a page break after each file's contents
    #[arg(short = 'b', long = "page-breaks")]
    pub page_breaks: bool,

    /// Add page numbers in the footer
    #[arg(short = 'n', long = "page-numbers")]
    pub page_numbers: bool,

    /// Landscape orientation
    #[arg(short = 'l', long = "landscape")]
    pub landscape: bool,

    /// Body font size
    #[arg(
        short = 's',
        long = "font-size",
        default_value_t = 12.0,
        value_parser = parse_font_size
    )]
    pub font_size: f64,

    /// Output file name
    #[arg(short = 'o', long = "output", default_value = "output.pdf")]
    pub output: PathBuf,

    /// Name of the font to use
    #[arg(short = 'f', long = "font", default_value = "Courier")]
    pub font: String,

    /// Use a monospace font (pass --mono=false to turn off)
    #[arg(
        long = "mono",
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = true,
        default_missing_value = "true"
    )]
    pub mono: bool,

    /// Use a proportional font
    #[arg(short = 'p', long = "proportional")]
    pub proportional: bool,

    /// Attempt to open the resulting file
    #[arg(short = 'x', long = "open-pdf-file")]
    pub open_pdf_file: bool,

    /// Text file input, comma-separated or repeated
    #[arg(long = "input-files", value_name = "FILE", value_delimiter = ',')]
    pub input_files: Vec<PathBuf>,

    /// Extra directory to search for TrueType fonts
    #[arg(long = "font-dir", value_name = "DIR")]
    pub font_dirs: Vec<PathBuf>,

    /// TOML settings file
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Log level for diagnostics on stderr
    #[arg(long = "log-level", value_enum, default_value_t = LogLevel::Error)]
    pub log_level: LogLevel,
}

fn parse_font_size(value: &str) -> Result<f64, String> {
    let size: f64 = value
        .parse()
        .map_err(|_| format!("'{}' is not a number", value))?;
    if size.is_finite() && size > 0.0 {
        Ok(size)
    } else {
        Err(format!("font size must be positive, got {}", value))
    }
}

impl CliArgs {
    /// Log filter directive implied by --verbose and --log-level
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            LogLevel::Debug.as_str()
        } else {
            self.log_level.as_str()
        }
    }
}

/// Diagnostic verbosity. Labelled run errors are printed regardless.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    /// Pages, fonts and bytes written
    Info,
    /// Per-input and per-font detail
    Debug,
    Trace,
}

impl LogLevel {
    /// `EnvFilter` directive for this level
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}
