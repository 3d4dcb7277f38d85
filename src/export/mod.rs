//! Getting the corrected text out of the window: clipboard, plain-text
//! files and Word documents.
//!
//! [`save_output`] picks the format from the file extension: `.docx` (any
//! case) writes a Word document with the text as a single paragraph, every
//! other extension writes plain UTF-8.
//!
//! Clipboard access creates a short-lived [`arboard::Clipboard`] per call;
//! the handle is not `Send` on every platform and is cheap to open.

use std::fs::{self, File};
use std::path::Path;

use arboard::Clipboard;
use docx_rs::{BreakType, Docx, Paragraph, Run};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("clipboard unavailable: {0}")]
    Clipboard(String),

    #[error("failed to write file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to write document: {0}")]
    Document(String),

    #[error("there is no text to export")]
    NothingToExport,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Replace the clipboard content with `text`.
///
/// # Errors
///
/// [`ExportError::NothingToExport`] for blank text, [`ExportError::Clipboard`]
/// when the OS clipboard cannot be opened or written.
pub fn copy_to_clipboard(text: &str) -> Result<(), ExportError> {
    ensure_not_blank(text)?;
    let mut clipboard = Clipboard::new().map_err(|e| ExportError::Clipboard(e.to_string()))?;
    clipboard
        .set_text(text)
        .map_err(|e| ExportError::Clipboard(e.to_string()))?;
    log::info!("export: copied {} chars to clipboard", text.chars().count());
    Ok(())
}

/// Write `text` to `path` as UTF-8, creating parent directories.
///
/// An existing file is overwritten.
pub fn save_text(path: &Path, text: &str) -> Result<(), ExportError> {
    ensure_not_blank(text)?;
    create_parent(path)?;
    fs::write(path, text)?;
    log::info!("export: saved {} chars to {}", text.chars().count(), path.display());
    Ok(())
}

/// Write `text` to `path` as a Word document holding one paragraph.
///
/// Line breaks inside the text become breaks within that paragraph.
pub fn save_docx(path: &Path, text: &str) -> Result<(), ExportError> {
    ensure_not_blank(text)?;
    create_parent(path)?;

    let mut run = Run::new();
    for (i, line) in text.lines().enumerate() {
        if i > 0 {
            run = run.add_break(BreakType::TextWrapping);
        }
        run = run.add_text(line);
    }

    let file = File::create(path)?;
    Docx::new()
        .add_paragraph(Paragraph::new().add_run(run))
        .build()
        .pack(file)
        .map_err(|e| ExportError::Document(e.to_string()))?;
    log::info!("export: saved {} chars as document to {}", text.chars().count(), path.display());
    Ok(())
}

/// Save `text` to `path`, as a Word document when the extension is `.docx`
/// and as plain text otherwise.
pub fn save_output(path: &Path, text: &str) -> Result<(), ExportError> {
    if is_docx(path) {
        save_docx(path, text)
    } else {
        save_text(path, text)
    }
}

fn is_docx(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("docx"))
}

fn create_parent(path: &Path) -> Result<(), ExportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

fn ensure_not_blank(text: &str) -> Result<(), ExportError> {
    if text.trim().is_empty() {
        Err(ExportError::NothingToExport)
    } else {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
