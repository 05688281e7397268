use crate::error::Result;

use super::OutputSurface;

/// Surface that only keeps its state in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    id: String,
    text: String,
    visible: bool,
    writes: usize,
}

impl MemorySurface {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            ..Self::default()
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of `set_text` calls so far.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl OutputSurface for MemorySurface {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_text(&mut self, text: &str) -> Result<()> {
        self.text = text.to_string();
        self.writes += 1;
        Ok(())
    }

    fn set_visible(&mut self, visible: bool) -> Result<()> {
        self.visible = visible;
        Ok(())
    }

    fn is_visible(&self) -> bool {
        self.visible
    }
}
