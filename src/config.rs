//! Resolved run configuration and the optional settings file.

use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cli::CliArgs;
use crate::error::{PdfPipeError, Result};

/// Family used whenever monospace output is in effect
pub const MONOSPACE_FAMILY: &str = "Courier";

/// Family substituted for the monospace default when proportional output is requested
pub const PROPORTIONAL_FAMILY: &str = "Helvetica";

/// Supported paper sizes
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaperSize {
    #[default]
    #[value(name = "A4")]
    A4,
    #[value(name = "A3")]
    A3,
    #[value(name = "A5")]
    A5,
    #[value(name = "Letter")]
    Letter,
    #[value(name = "Legal")]
    Legal,
}

impl PaperSize {
    /// Portrait width and height in millimeters
    pub fn dimensions_mm(&self) -> (f64, f64) {
        match self {
            PaperSize::A3 => (297.0, 420.0),
            PaperSize::A4 => (210.0, 297.0),
            PaperSize::A5 => (148.0, 210.0),
            PaperSize::Letter => (215.9, 279.4),
            PaperSize::Legal => (215.9, 355.6),
        }
    }
}

impl std::fmt::Display for PaperSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaperSize::A3 => write!(f, "A3"),
            PaperSize::A4 => write!(f, "A4"),
            PaperSize::A5 => write!(f, "A5"),
            PaperSize::Letter => write!(f, "Letter"),
            PaperSize::Legal => write!(f, "Legal"),
        }
    }
}

/// Page orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    pub fn from_landscape(landscape: bool) -> Self {
        if landscape {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }

    /// Single-letter orientation code ("P" or "L")
    pub fn code(&self) -> &'static str {
        match self {
            Orientation::Portrait => "P",
            Orientation::Landscape => "L",
        }
    }
}

/// Apply the font flags to the requested family name.
///
/// `proportional` wins over `mono`. Monospace always means [`MONOSPACE_FAMILY`];
/// otherwise the untouched default is swapped for [`PROPORTIONAL_FAMILY`] and
/// any other explicit name is kept as given.
pub fn resolve_font_family(font: &str, mono: bool, proportional: bool) -> String {
    let mono = mono && !proportional;

    if mono {
        MONOSPACE_FAMILY.to_string()
    } else if font.eq_ignore_ascii_case(MONOSPACE_FAMILY) {
        PROPORTIONAL_FAMILY.to_string()
    } else {
        font.to_string()
    }
}

/// Page margins in millimeters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageMargins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for PageMargins {
    fn default() -> Self {
        Self {
            top: 10.0,
            right: 10.0,
            bottom: 20.0,
            left: 10.0,
        }
    }
}

/// Rendering settings that rarely change between runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Extra directories searched for TrueType fonts
    pub font_dirs: Vec<PathBuf>,

    /// Family used for the page-number footer
    pub footer_font: String,

    /// Page margins
    pub margins: PageMargins,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            font_dirs: Vec::new(),
            footer_font: PROPORTIONAL_FAMILY.to_string(),
            margins: PageMargins::default(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| PdfPipeError::Settings {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let settings = Self::from_toml_str(&raw).map_err(|reason| PdfPipeError::Settings {
            path: path.to_path_buf(),
            reason,
        })?;

        debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    fn from_toml_str(raw: &str) -> std::result::Result<Self, String> {
        toml::from_str(raw).map_err(|e| e.to_string())
    }
}

/// Immutable configuration for one conversion run
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub title: String,
    pub paper: PaperSize,
    pub orientation: Orientation,
    pub font_size: f64,
    pub output: PathBuf,
    /// Resolved font family name
    pub font_family: String,
    pub page_breaks: bool,
    pub page_numbers: bool,
    pub open_after_write: bool,
    /// Named inputs; empty means standard input is the content source
    pub input_files: Vec<PathBuf>,
    pub settings: Settings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: String::new(),
            paper: PaperSize::A4,
            orientation: Orientation::Portrait,
            font_size: 12.0,
            output: PathBuf::from("output.pdf"),
            font_family: MONOSPACE_FAMILY.to_string(),
            page_breaks: false,
            page_numbers: false,
            open_after_write: false,
            input_files: Vec::new(),
            settings: Settings::default(),
        }
    }
}

impl Config {
    /// Resolve parsed command-line arguments into a run configuration
    pub fn from_args(args: &CliArgs) -> Result<Self> {
        let mut settings = match &args.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };

        // Directories given on the command line are searched first
        let mut font_dirs = args.font_dirs.clone();
        font_dirs.append(&mut settings.font_dirs);
        settings.font_dirs = font_dirs;

        let config = Self {
            title: args.title.clone(),
            paper: args.paper,
            orientation: Orientation::from_landscape(args.landscape),
            font_size: args.font_size,
            output: args.output.clone(),
            font_family: resolve_font_family(&args.font, args.mono, args.proportional),
            page_breaks: args.page_breaks,
            page_numbers: args.page_numbers,
            open_after_write: args.open_pdf_file,
            input_files: args.input_files.clone(),
            settings,
        };

        debug!(
            "Resolved configuration: paper={} orientation={} font={} size={}",
            config.paper,
            config.orientation.code(),
            config.font_family,
            config.font_size
        );
        Ok(config)
    }

    /// Page width and height in millimeters, after orientation is applied
    pub fn page_size_mm(&self) -> (f64, f64) {
        let (width, height) = self.paper.dimensions_mm();
        match self.orientation {
            Orientation::Portrait => (width, height),
            Orientation::Landscape => (height, width),
        }
    }

    /// Whether content comes from standard input rather than named files
    pub fn reads_stdin(&self) -> bool {
        self.input_files.is_empty()
    }
}
