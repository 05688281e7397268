use std::sync::Arc;

use async_trait::async_trait;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{COOKIE, SET_COOKIE};
use reqwest::redirect::Policy;
use reqwest::{Client, Url};

use crate::config::{AppConfig, CredentialsConfig, HttpConfig};
use crate::error::{AppError, Result};

use super::{CredentialsMode, FetchRequest, FetchResponse, Transport};

/// reqwest-backed transport with a cookie jar scoped to one origin.
///
/// The jar is consulted per request instead of being installed on the client,
/// so `CredentialsMode::Omit` requests go out without cookies and leave the
/// jar untouched. Redirects are not followed: a 3xx is returned as-is, since
/// the jar would not be re-consulted for the next hop.
pub struct HttpTransport {
    client: Client,
    base_url: Url,
    jar: Arc<Jar>,
}

impl HttpTransport {
    pub fn new(base_url: &str, credentials: &CredentialsConfig, http: &HttpConfig) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| AppError::InvalidUrl(format!("{base_url}: {e}")))?;

        let jar = Arc::new(Jar::default());
        for cookie in &credentials.cookies {
            jar.add_cookie_str(cookie, &base_url);
        }

        let mut builder = Client::builder().redirect(Policy::none());
        if let Some(timeout) = http.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| AppError::Transport(format!("Failed to build HTTP client: {e}")))?;

        tracing::debug!(
            base_url = %base_url,
            cookies = credentials.cookies.len(),
            "HTTP transport ready"
        );

        Ok(Self {
            client,
            base_url,
            jar,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(&config.server.base_url, &config.credentials, &config.http)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The `Cookie` header value the jar would send to `url`, if any.
    pub fn cookies_for(&self, url: &Url) -> Option<String> {
        self.jar
            .cookies(url)
            .and_then(|v| v.to_str().ok().map(str::to_string))
    }

    fn resolve(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| AppError::InvalidUrl(format!("{path}: {e}")))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, request: &FetchRequest) -> Result<FetchResponse> {
        let url = self.resolve(&request.path)?;

        let mut builder = self.client.get(url.clone());
        if request.credentials == CredentialsMode::Include {
            if let Some(cookies) = self.jar.cookies(&url) {
                builder = builder.header(COOKIE, cookies);
            }
        }

        let response = builder.send().await?;

        if request.credentials == CredentialsMode::Include {
            let mut set_cookies = response.headers().get_all(SET_COOKIE).iter();
            self.jar.set_cookies(&mut set_cookies, &url);
        }

        let status = response.status().as_u16();
        let final_url = response.url().to_string();

        Ok(FetchResponse::new(status, final_url, async move {
            Ok(response.bytes().await?.to_vec())
        }))
    }
}
