use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};

use super::OutputSurface;

/// Surface backed by a file: the file exists exactly while the surface is
/// visible, and always holds the full current text.
pub struct FileSurface {
    id: String,
    path: PathBuf,
    text: String,
    visible: bool,
    writes: usize,
}

impl FileSurface {
    pub fn new(id: &str, path: impl Into<PathBuf>) -> Self {
        Self {
            id: id.to_string(),
            path: path.into(),
            text: String::new(),
            visible: false,
            writes: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of times the file has been written.
    pub fn writes(&self) -> usize {
        self.writes
    }

    fn write_file(&mut self) -> Result<()> {
        fs::write(&self.path, &self.text).map_err(|e| {
            AppError::Surface(format!("Failed to write {}: {e}", self.path.display()))
        })?;
        self.writes += 1;
        Ok(())
    }

    fn remove_file(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Surface(format!(
                "Failed to remove {}: {e}",
                self.path.display()
            ))),
        }
    }
}

impl OutputSurface for FileSurface {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_text(&mut self, text: &str) -> Result<()> {
        self.text = text.to_string();
        if self.visible {
            self.write_file()?;
        }
        Ok(())
    }

    fn set_visible(&mut self, visible: bool) -> Result<()> {
        // While visible, set_text already keeps the file current
        if visible && self.visible {
            return Ok(());
        }
        self.visible = visible;
        if visible {
            self.write_file()
        } else {
            self.remove_file()
        }
    }

    fn is_visible(&self) -> bool {
        self.visible
    }
}
