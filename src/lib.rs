//! pdfpipe
//!
//! Converts plain text from files or standard input into a paginated PDF
//! document, with configurable paper size, orientation, font, title, page
//! breaks and page numbering. Layout and PDF serialization are done by
//! [`genpdf`].

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod fonts;
pub mod input;
pub mod layout;
pub mod open;
pub mod render;

pub use app::{Converter, RunReport};
pub use config::Config;
pub use error::{PdfPipeError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::{
        app::{Converter, RunReport},
        cli::CliArgs,
        config::{Config, Orientation, PaperSize, Settings},
        error::{PdfPipeError, Result},
        fonts::FontRegistry,
        input::{ContentSource, ContentUnit},
        layout::{Block, DocumentPlan},
        open::{Opener, SystemOpener},
    };

    pub use tracing::{debug, error, info, warn};
}
