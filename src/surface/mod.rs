pub mod file;
pub mod memory;
pub mod terminal;

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::{AppError, Result};

pub use file::FileSurface;
pub use memory::MemorySurface;
pub use terminal::TerminalSurface;

/// Identifier of the surface the protected data is rendered into.
pub const DEFAULT_SURFACE_ID: &str = "api-response";

/// An identified region that shows a block of text and can be hidden.
pub trait OutputSurface: Send {
    fn id(&self) -> &str;

    /// Replace the current text. Never appends.
    fn set_text(&mut self, text: &str) -> Result<()>;

    fn set_visible(&mut self, visible: bool) -> Result<()>;

    fn is_visible(&self) -> bool;
}

pub type SurfaceHandle = Arc<Mutex<dyn OutputSurface>>;

/// Surfaces provisioned by the host, looked up by identifier.
#[derive(Default, Clone)]
pub struct SurfaceRegistry {
    surfaces: HashMap<String, SurfaceHandle>,
}

impl SurfaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provision a surface under its own id, replacing any previous one.
    /// Returns a typed handle so the host can keep observing it.
    pub fn register<S: OutputSurface + 'static>(&mut self, surface: S) -> Arc<Mutex<S>> {
        let id = surface.id().to_string();
        let typed = Arc::new(Mutex::new(surface));
        let handle: SurfaceHandle = typed.clone();
        if self.surfaces.insert(id.clone(), handle).is_some() {
            tracing::debug!(surface = %id, "Replaced output surface");
        }
        typed
    }

    pub fn resolve(&self, id: &str) -> Result<SurfaceHandle> {
        self.surfaces
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::SurfaceNotFound(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.surfaces.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }
}
