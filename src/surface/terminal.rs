use std::io::{self, Stdout, Write};

use crate::error::{AppError, Result};

use super::OutputSurface;

/// Writes the surface text to a stream whenever the surface is shown.
///
/// A terminal cannot take text back, so hiding only stops further output.
pub struct TerminalSurface<W: Write + Send> {
    id: String,
    text: String,
    visible: bool,
    out: W,
}

impl TerminalSurface<Stdout> {
    pub fn stdout(id: &str) -> Self {
        Self::new(id, io::stdout())
    }
}

impl<W: Write + Send> TerminalSurface<W> {
    pub fn new(id: &str, out: W) -> Self {
        Self {
            id: id.to_string(),
            text: String::new(),
            visible: false,
            out,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn flush_text(&mut self) -> Result<()> {
        writeln!(self.out, "{}", self.text)
            .and_then(|_| self.out.flush())
            .map_err(|e| AppError::Surface(format!("Failed to write to terminal: {e}")))
    }
}

impl<W: Write + Send> OutputSurface for TerminalSurface<W> {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_text(&mut self, text: &str) -> Result<()> {
        self.text = text.to_string();
        Ok(())
    }

    fn set_visible(&mut self, visible: bool) -> Result<()> {
        self.visible = visible;
        if visible {
            self.flush_text()?;
        }
        Ok(())
    }

    fn is_visible(&self) -> bool {
        self.visible
    }
}
