//! Opening a finished PDF with the platform's default viewer.

use std::path::Path;
use std::process::{Command, Stdio};

use tracing::{debug, info};

use crate::error::{PdfPipeError, Result};

/// Something that can hand a file to an external viewer
pub trait Opener {
    fn open(&self, path: &Path) -> Result<()>;
}

/// Launches the OS "open with default application" command
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemOpener;

impl SystemOpener {
    fn command(path: &Path) -> Command {
        if cfg!(target_os = "windows") {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", "start", ""]).arg(path);
            cmd
        } else if cfg!(target_os = "macos") {
            let mut cmd = Command::new("open");
            cmd.arg(path);
            cmd
        } else {
            let mut cmd = Command::new("xdg-open");
            cmd.arg(path);
            cmd
        }
    }
}

impl Opener for SystemOpener {
    fn open(&self, path: &Path) -> Result<()> {
        let mut cmd = Self::command(path);
        debug!("Launching viewer: {:?}", cmd);

        // The viewer keeps running after we exit, so don't wait on it
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| PdfPipeError::Open {
                path: path.to_path_buf(),
                source,
            })?;

        info!("Requested viewer for {}", path.display());
        Ok(())
    }
}
