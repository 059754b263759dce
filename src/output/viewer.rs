//! Show a rendered chart in the system's default viewer.
//!
//! The page goes to a scratch file in the temp directory; nothing is written
//! next to the database.

use crate::utils::error::OutputError;
use log::{debug, info};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Write the page to a temp file and open it
///
/// Returns the scratch file path. The file is left in place so the viewer
/// can load it after this process exits.
pub fn show_html(html: &str) -> Result<PathBuf, OutputError> {
    let path = write_scratch_page(html)?;
    open_in_viewer(&path)?;
    Ok(path)
}

/// Write the page to a persistent temp file without opening it
pub fn write_scratch_page(html: &str) -> Result<PathBuf, OutputError> {
    let mut file = tempfile::Builder::new()
        .prefix("packet-graph-")
        .suffix(".html")
        .tempfile()?;

    file.write_all(html.as_bytes())?;
    file.flush()?;

    let (_, path) = file.keep().map_err(|e| OutputError::WriteFailed(e.error))?;
    debug!("Scratch chart page: {}", path.display());
    Ok(path)
}

/// Launch the platform opener for a file
pub fn open_in_viewer(path: &Path) -> Result<(), OutputError> {
    info!("Opening chart: {}", path.display());

    let mut command = opener_command(path);
    command
        .spawn()
        .map_err(|e| OutputError::ViewerFailed(format!("{}: {}", path.display(), e)))?;

    Ok(())
}

#[cfg(target_os = "macos")]
fn opener_command(path: &Path) -> Command {
    let mut command = Command::new("open");
    command.arg(path);
    command
}

#[cfg(target_os = "windows")]
fn opener_command(path: &Path) -> Command {
    let mut command = Command::new("cmd");
    command.args(["/C", "start", ""]).arg(path);
    command
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn opener_command(path: &Path) -> Command {
    let mut command = Command::new("xdg-open");
    command.arg(path);
    command
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_scratch_page() {
        let path = write_scratch_page("<html></html>").unwrap();

        assert!(path.exists());
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("html"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<html></html>");

        std::fs::remove_file(path).unwrap();
    }
}
