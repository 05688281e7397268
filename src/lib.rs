pub mod config;
pub mod error;
pub mod fetcher;
pub mod health;
pub mod outcome;
pub mod surface;
pub mod transport;

pub use error::{AppError, Result};
pub use fetcher::ProtectedFetcher;
pub use outcome::ResponseOutcome;
pub use surface::{OutputSurface, SurfaceRegistry};
pub use transport::{HttpTransport, Transport};
