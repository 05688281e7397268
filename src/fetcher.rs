use std::sync::Arc;

use crate::error::Result;
use crate::outcome::ResponseOutcome;
use crate::surface::{SurfaceRegistry, DEFAULT_SURFACE_ID};
use crate::transport::{CredentialsMode, FetchRequest, Transport};

/// Path of the cookie-protected resource.
pub const PROTECTED_DATA_PATH: &str = "/api/v1/data";

/// Fetches the protected resource and renders the outcome into one surface.
///
/// Invocations are independent: concurrent calls are neither de-duplicated nor
/// cancelled, and whichever finishes last owns the surface text.
pub struct ProtectedFetcher {
    transport: Arc<dyn Transport>,
    surfaces: SurfaceRegistry,
    surface_id: String,
}

impl ProtectedFetcher {
    pub fn new(transport: Arc<dyn Transport>, surfaces: SurfaceRegistry) -> Self {
        Self {
            transport,
            surfaces,
            surface_id: DEFAULT_SURFACE_ID.to_string(),
        }
    }

    /// Render into a surface other than `api-response`.
    pub fn with_surface_id(mut self, surface_id: &str) -> Self {
        self.surface_id = surface_id.to_string();
        self
    }

    pub fn surface_id(&self) -> &str {
        &self.surface_id
    }

    /// Request the protected data and classify the response.
    pub async fn fetch_outcome(&self) -> ResponseOutcome {
        tracing::info!("fetchProtectedData");

        let request = FetchRequest::get(PROTECTED_DATA_PATH, CredentialsMode::Include);
        let result = self.transport.get(&request).await;
        if let Ok(response) = &result {
            tracing::info!(response = ?response, "Received response");
        }

        let outcome = ResponseOutcome::from_result(result).await;
        match &outcome {
            ResponseOutcome::Success(payload) => {
                tracing::info!(payload = %payload, "Protected data:");
            }
            ResponseOutcome::Unauthorized(_) => {
                // Redirecting to the login page on 401 is intentionally dormant:
                // the outcome is rendered in place and no navigation happens.
            }
            ResponseOutcome::UnexpectedStatus(status) => {
                tracing::warn!(status, "Unexpected status");
            }
            ResponseOutcome::TransportFailure(e) => {
                tracing::error!(error = %e, "Fetch error:");
            }
        }

        outcome
    }

    /// Fetch, then render the outcome into the output surface and show it.
    ///
    /// Every request outcome is rendered. The only error returned is a surface
    /// that was never provisioned (or that rejects the write).
    pub async fn execute(&self) -> Result<()> {
        let outcome = self.fetch_outcome().await;

        let surface = self.surfaces.resolve(&self.surface_id)?;
        let text = outcome.render();

        // Surface writes are synchronous (a file surface does blocking I/O) and
        // run while the lock is held; one short write per invocation.
        let mut surface = surface.lock().await;
        surface.set_text(&text)?;
        surface.set_visible(true)?;

        tracing::debug!(
            surface = %self.surface_id,
            status = ?outcome.status_code(),
            "Rendered outcome"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::surface::{FileSurface, MemorySurface, OutputSurface};
    use crate::transport::FetchResponse;
    use async_trait::async_trait;
    use std::sync::Mutex as StdMutex;
    use std::time::Duration;
    use tokio::sync::Mutex;

    enum Stub {
        Status(u16, &'static str),
        ConnectionError,
    }

    struct StubTransport {
        reply: Stub,
        delay: Option<Duration>,
        requests: StdMutex<Vec<FetchRequest>>,
    }

    impl StubTransport {
        fn new(reply: Stub) -> Self {
            Self {
                reply,
                delay: None,
                requests: StdMutex::new(Vec::new()),
            }
        }

        fn delayed(reply: Stub, delay: Duration) -> Self {
            Self {
                delay: Some(delay),
                ..Self::new(reply)
            }
        }

        fn requests(&self) -> Vec<FetchRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for StubTransport {
        async fn get(&self, request: &FetchRequest) -> Result<FetchResponse> {
            self.requests.lock().unwrap().push(request.clone());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            match &self.reply {
                Stub::Status(status, body) => Ok(FetchResponse::from_bytes(
                    *status,
                    format!("http://localhost:3000{}", request.path),
                    *body,
                )),
                Stub::ConnectionError => Err(AppError::Transport("connection refused".to_string())),
            }
        }
    }

    fn fetcher_with(stub: Stub) -> (ProtectedFetcher, Arc<Mutex<MemorySurface>>, Arc<StubTransport>) {
        let transport = Arc::new(StubTransport::new(stub));
        let mut surfaces = SurfaceRegistry::new();
        let surface = surfaces.register(MemorySurface::new(DEFAULT_SURFACE_ID));
        let fetcher = ProtectedFetcher::new(transport.clone(), surfaces);
        (fetcher, surface, transport)
    }

    #[tokio::test]
    async fn test_requests_protected_path_with_credentials() {
        let (fetcher, _surface, transport) = fetcher_with(Stub::Status(200, "{}"));
        fetcher.execute().await.unwrap();

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].path, "/api/v1/data");
        assert_eq!(requests[0].credentials, CredentialsMode::Include);
    }

    #[tokio::test]
    async fn test_success_renders_pretty_json() {
        let (fetcher, surface, _) = fetcher_with(Stub::Status(200, r#"{"user":"alice"}"#));
        fetcher.execute().await.unwrap();

        let surface = surface.lock().await;
        assert_eq!(surface.text(), "{\n  \"user\": \"alice\"\n}");
        assert!(surface.is_visible());
    }

    #[tokio::test]
    async fn test_unauthorized_renders_authentication_error() {
        let (fetcher, surface, transport) = fetcher_with(Stub::Status(401, ""));
        fetcher.execute().await.unwrap();

        let surface = surface.lock().await;
        assert_eq!(surface.text(), "Authentication Error: 401");
        assert!(surface.is_visible());
        // No follow-up request to a login page
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_other_statuses_render_unexpected_error() {
        for status in [100, 201, 204, 301, 400, 403, 404, 418, 500, 502, 503] {
            let (fetcher, surface, _) = fetcher_with(Stub::Status(status, "ignored"));
            fetcher.execute().await.unwrap();

            let surface = surface.lock().await;
            assert_eq!(surface.text(), format!("Unexpected error2: {status}"));
            assert!(surface.is_visible());
        }
    }

    #[tokio::test]
    async fn test_connection_error_renders_network_error() {
        let (fetcher, surface, _) = fetcher_with(Stub::ConnectionError);
        fetcher.execute().await.unwrap();

        let surface = surface.lock().await;
        assert_eq!(surface.text(), "Network or server error.");
        assert!(surface.is_visible());
    }

    #[tokio::test]
    async fn test_malformed_body_renders_network_error() {
        let (fetcher, surface, _) = fetcher_with(Stub::Status(200, "{\"user\":"));
        fetcher.execute().await.unwrap();

        let surface = surface.lock().await;
        assert_eq!(surface.text(), "Network or server error.");
        assert!(surface.is_visible());
    }

    #[tokio::test]
    async fn test_repeated_calls_overwrite() {
        let (fetcher, surface, _) = fetcher_with(Stub::Status(500, ""));

        fetcher.execute().await.unwrap();
        let first = surface.lock().await.text().to_string();
        fetcher.execute().await.unwrap();

        let surface = surface.lock().await;
        assert_eq!(surface.text(), first);
        assert_eq!(surface.text(), "Unexpected error2: 500");
        assert_eq!(surface.writes(), 2);
        assert!(surface.is_visible());
    }

    #[tokio::test]
    async fn test_file_surface_written_once_per_call() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("api-response.txt");

        let mut surfaces = SurfaceRegistry::new();
        let surface = surfaces.register(FileSurface::new(DEFAULT_SURFACE_ID, &path));
        let fetcher = ProtectedFetcher::new(
            Arc::new(StubTransport::new(Stub::Status(200, r#"{"user":"alice"}"#))),
            surfaces,
        );

        fetcher.execute().await.unwrap();
        fetcher.execute().await.unwrap();

        let surface = surface.lock().await;
        assert_eq!(surface.writes(), 2);
        assert!(surface.is_visible());
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "{\n  \"user\": \"alice\"\n}"
        );
    }

    #[tokio::test]
    async fn test_missing_surface_fails_after_request() {
        let transport = Arc::new(StubTransport::new(Stub::Status(200, "{}")));
        let fetcher = ProtectedFetcher::new(transport.clone(), SurfaceRegistry::new());

        let result = fetcher.execute().await;
        assert!(matches!(result, Err(AppError::SurfaceNotFound(id)) if id == "api-response"));
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_custom_surface_id() {
        let transport = Arc::new(StubTransport::new(Stub::Status(401, "")));
        let mut surfaces = SurfaceRegistry::new();
        let default = surfaces.register(MemorySurface::new(DEFAULT_SURFACE_ID));
        let panel = surfaces.register(MemorySurface::new("side-panel"));
        let fetcher = ProtectedFetcher::new(transport, surfaces).with_surface_id("side-panel");

        fetcher.execute().await.unwrap();

        assert_eq!(panel.lock().await.text(), "Authentication Error: 401");
        assert!(!default.lock().await.is_visible());
    }

    #[tokio::test]
    async fn test_concurrent_calls_last_finisher_wins() {
        let mut surfaces = SurfaceRegistry::new();
        let surface = surfaces.register(MemorySurface::new(DEFAULT_SURFACE_ID));

        let slow = ProtectedFetcher::new(
            Arc::new(StubTransport::delayed(Stub::Status(503, ""), Duration::from_millis(100))),
            surfaces.clone(),
        );
        let fast = ProtectedFetcher::new(
            Arc::new(StubTransport::new(Stub::Status(200, r#"{"ok":true}"#))),
            surfaces,
        );

        let (a, b) = tokio::join!(slow.execute(), fast.execute());
        a.unwrap();
        b.unwrap();

        let surface = surface.lock().await;
        assert_eq!(surface.text(), "Unexpected error2: 503");
        assert_eq!(surface.writes(), 2);
    }
}
