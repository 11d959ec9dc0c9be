//! Output of rendered dashboards.
//!
//! Supports JSON to stdout, JSON to a file, and HTML pages on disk.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

/// Writes `value` as pretty-printed JSON to stdout.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    serde_json::to_writer_pretty(&mut handle, value)?;
    writeln!(handle)?;
    Ok(())
}

/// Writes `value` as pretty-printed JSON to `path`, replacing any existing file.
pub fn write_json(path: &Path, value: &impl Serialize) -> Result<()> {
    let body = serde_json::to_vec_pretty(value)?;
    write_file(path, &body)?;
    info!(path = %path.display(), bytes = body.len(), "JSON written");
    Ok(())
}

/// Writes a rendered HTML page to `path`.
pub fn write_page(path: &Path, html: &str) -> Result<()> {
    write_file(path, html.as_bytes())?;
    info!(path = %path.display(), bytes = html.len(), "Page written");
    Ok(())
}

fn write_file(path: &Path, body: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        debug!(dir = %parent.display(), "Creating output directory");
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, body).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
