pub mod endpoints;
pub mod error;
pub mod pagination;
pub mod params;
pub mod types;

pub use edusoho_auth::Credential;
pub use endpoints::{extract_token, NewOrder, NewTrade};
pub use error::{ApiError, ErrorKind, Result};
pub use pagination::{collect_pages, PagedResponse, Paging};
pub use params::Params;
pub use reqwest::Method;
pub use types::{
    CollectAction, IdentifyType, PaymentGateway, SmsType, TargetType, TaskEvent, TradeType,
};

use reqwest::{Client, RequestBuilder};
use std::borrow::Cow;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

pub const ACCEPT_HEADER: &str = "application/vnd.edusoho.v2+json";

/// Client for one EduSoho site.
///
/// Cloning is cheap and clones share the connection pool. The credential is
/// part of the value: [`ApiClient::authenticate`] hands back a new client and
/// leaves the original untouched, so differently authenticated clients can
/// be used side by side.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    credential: Credential,
    debug: bool,
}

impl ApiClient {
    pub fn new(base_url: impl AsRef<str>, debug: bool) -> Result<Self> {
        let client = Client::builder()
            .user_agent(format!("edusoho-api/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(ApiError::Transport)?;

        Self::with_http_client(client, base_url, debug)
    }

    /// Use a preconfigured transport, e.g. one with a custom timeout or proxy.
    pub fn with_http_client(client: Client, base_url: impl AsRef<str>, debug: bool) -> Result<Self> {
        Ok(Self {
            client,
            base_url: normalize_base_url(base_url.as_ref())?,
            credential: Credential::Anonymous,
            debug,
        })
    }

    /// Token when `secret` is `None`, username/password otherwise.
    pub fn authenticate(&self, identifier: &str, secret: Option<&str>) -> Self {
        self.with_credential(Credential::from_parts(identifier, secret))
    }

    pub fn with_token(&self, token: impl AsRef<str>) -> Self {
        self.with_credential(Credential::token(token))
    }

    pub fn with_basic_auth(&self, username: impl AsRef<str>, password: impl AsRef<str>) -> Self {
        self.with_credential(Credential::basic(username, password))
    }

    pub fn with_credential(&self, credential: Credential) -> Self {
        Self {
            credential,
            ..self.clone()
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    /// Dispatches with this client's credential.
    pub async fn request(&self, method: Method, path: &str, params: &Params) -> Result<String> {
        self.send(&self.credential, method, path, params).await
    }

    /// Dispatches and folds any failure into a string.
    ///
    /// Failures become the diagnostic message when the client is in debug
    /// mode and the numeric status code (`0` without one) otherwise.
    pub async fn request_string(&self, method: Method, path: &str, params: &Params) -> String {
        match self.request(method, path, params).await {
            Ok(body) => body,
            Err(err) => err.to_legacy_string(self.debug),
        }
    }

    /// The dispatcher: `GET` params go to the query string, every other
    /// verb sends them as a JSON body. Returns the raw success body.
    pub async fn send(
        &self,
        credential: &Credential,
        method: Method,
        path: &str,
        params: &Params,
    ) -> Result<String> {
        let url = self.url(path)?;
        debug!(method = %method, url = %url, params = params.len(), "Sending request");

        let mut req = self.client.request(method.clone(), url.clone());
        req = apply_headers(req, credential);

        req = if method == Method::GET {
            if params.is_empty() {
                req
            } else {
                req.query(&params.to_query_pairs())
            }
        } else {
            req.json(params)
        };

        let response = req.send().await.map_err(|err| {
            warn!(method = %method, url = %url, error = %err, "Transport failure");
            ApiError::Transport(err)
        })?;

        let status = response.status();
        if status.is_success() {
            return response.text().await.map_err(ApiError::Transport);
        }

        // A truncated failure body must not hide the status code.
        let body = response.text().await.unwrap_or_default();
        warn!(method = %method, url = %url, status = status.as_u16(), "Request failed");
        Err(ApiError::Status {
            status: status.as_u16(),
            body,
        })
    }

    pub(crate) async fn get(&self, path: &str, params: &Params) -> Result<String> {
        self.request(Method::GET, path, params).await
    }

    pub(crate) async fn post(&self, path: &str, params: &Params) -> Result<String> {
        self.request(Method::POST, path, params).await
    }

    pub(crate) async fn patch(&self, path: &str, params: &Params) -> Result<String> {
        self.request(Method::PATCH, path, params).await
    }

    pub(crate) async fn delete(&self, path: &str, params: &Params) -> Result<String> {
        self.request(Method::DELETE, path, params).await
    }

    fn url(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }
}

fn apply_headers(request: RequestBuilder, credential: &Credential) -> RequestBuilder {
    let request = request
        .header(reqwest::header::ACCEPT, ACCEPT_HEADER)
        .header(reqwest::header::CACHE_CONTROL, "no-cache");

    credential
        .headers()
        .into_iter()
        .fold(request, |req, (name, value)| req.header(name, value))
}

/// Ensures the base URL ends in `/` so relative paths resolve beneath it.
fn normalize_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw.trim())?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Percent-encodes a caller-supplied identifier so it stays one path segment.
///
/// `.` and `..` would still be resolved as relative segments, so they are rejected.
pub(crate) fn path_segment(raw: &str) -> Result<Cow<'_, str>> {
    match raw {
        "" | "." | ".." => Err(ApiError::InvalidArgument(format!(
            "invalid path identifier: {raw:?}"
        ))),
        _ => Ok(urlencoding::encode(raw)),
    }
}

/// Parses a verb case-insensitively. Only GET, POST, PATCH and DELETE are accepted.
pub fn parse_method(raw: &str) -> Result<Method> {
    match raw.trim().to_ascii_uppercase().as_str() {
        "GET" => Ok(Method::GET),
        "POST" => Ok(Method::POST),
        "PATCH" => Ok(Method::PATCH),
        "DELETE" => Ok(Method::DELETE),
        other => Err(ApiError::InvalidArgument(format!(
            "unsupported HTTP method: {other}"
        ))),
    }
}
