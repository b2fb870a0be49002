//! HTTP plumbing shared by every resource call.

use reqwest::Method;
use reqwest::header::CONTENT_TYPE;
use schoolhub_core::config::BackendConfig;
use schoolhub_core::error::{Result, SchoolHubError};
use schoolhub_core::session::Session;
use schoolhub_core::types::Page;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::resources::Resource;

/// Client for the SRS REST backend.
#[derive(Clone)]
pub struct SrsClient {
    /// Backend base URL without a trailing slash.
    base_url: String,
    /// Identity whose token is attached to requests.
    session: Option<Session>,
    /// Caller-supplied token; wins over the session's.
    token: Option<String>,
    client: reqwest::Client,
}

/// A backend response passed through untouched.
#[derive(Debug, Clone)]
pub struct Forwarded {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// Body of a single-entity response: either the entity itself or `{data: …}`.
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data } | Envelope::Bare(data) => data,
        }
    }
}

/// Body of an unpaginated list: a page or a bare array.
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum ListBody<T> {
    Page(Page<T>),
    Bare(Vec<T>),
}

impl SrsClient {
    pub fn new(config: &BackendConfig, session: Option<Session>) -> Result<Self> {
        let base_url = config.srs_server.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(SchoolHubError::Config("backend.srs_server is not set".into()));
        }
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SchoolHubError::Http(format!("Client error: {e}")))?;
        Ok(Self {
            base_url,
            session,
            token: None,
            client,
        })
    }

    /// A copy that authenticates as the caller holding `token`. Shares the
    /// underlying connection pool.
    pub fn with_token(&self, token: Option<String>) -> Self {
        Self {
            token: token.filter(|t| !t.trim().is_empty()),
            ..self.clone()
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// `<base>/<resource path><suffix>`.
    pub(crate) fn url(&self, resource: Resource, suffix: &str) -> String {
        format!("{}{}{}", self.base_url, resource.path(), suffix)
    }

    /// [`resource_path`] on this backend.
    pub(crate) fn entity_url(&self, resource: Resource, segments: &[&str]) -> Result<String> {
        Ok(format!("{}{}", self.base_url, resource_path(resource, segments)?))
    }

    /// Attach `Authorization: Bearer` whenever a token is known.
    fn apply_auth(&self, req: reqwest::RequestBuilder, bearer: Option<&str>) -> reqwest::RequestBuilder {
        let token = bearer
            .or(self.token.as_deref())
            .or_else(|| self.session.as_ref().and_then(Session::bearer));
        match token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let req = self.client.get(url).query(query);
        let text = self.execute(Method::GET, url, req).await?;
        decode(url, &text)
    }

    /// GET a single entity, accepting both bare and `{data: …}` bodies.
    pub(crate) async fn get_entity<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        self.get_json::<Envelope<T>>(url, &[])
            .await
            .map(Envelope::into_inner)
    }

    /// GET a list that some backends paginate and others return bare.
    pub(crate) async fn get_list<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>> {
        Ok(match self.get_json::<ListBody<T>>(url, query).await? {
            ListBody::Page(page) => page.data,
            ListBody::Bare(items) => items,
        })
    }

    /// POST/PATCH a JSON body and decode the returned entity.
    pub(crate) async fn send_entity<B, T>(&self, method: Method, url: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let req = self.client.request(method.clone(), url).json(body);
        let text = self.execute(method, url, req).await?;
        decode::<Envelope<T>>(url, &text).map(Envelope::into_inner)
    }

    /// POST a JSON body, ignoring whatever the backend answers on success.
    pub(crate) async fn post_unit<B: Serialize + ?Sized>(&self, url: &str, body: &B) -> Result<()> {
        let req = self.client.post(url).json(body);
        self.execute(Method::POST, url, req).await.map(|_| ())
    }

    pub(crate) async fn delete(&self, url: &str) -> Result<()> {
        let req = self.client.delete(url);
        self.execute(Method::DELETE, url, req).await.map(|_| ())
    }

    /// Send a request and return the body text of a 2xx response.
    async fn execute(&self, method: Method, url: &str, req: reqwest::RequestBuilder) -> Result<String> {
        let req = self.apply_auth(req, None);
        tracing::debug!(%method, url, "backend request");

        let resp = req.send().await.map_err(|e| {
            tracing::warn!(%method, url, error = %e, "backend unreachable");
            SchoolHubError::Http(format!("{method} {url} failed: {e}"))
        })?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| SchoolHubError::Http(format!("Read body failed: {e}")))?;

        if !status.is_success() {
            let message = extract_message(&text)
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
            tracing::warn!(%method, url, status = status.as_u16(), %message, "backend error");
            return Err(SchoolHubError::from_status(status.as_u16(), message));
        }
        Ok(text)
    }

    /// Replay a request against the backend and hand back the raw response.
    ///
    /// Non-2xx statuses are not errors here; only transport failures are.
    pub async fn forward(
        &self,
        method: Method,
        path_and_query: &str,
        bearer: Option<&str>,
    ) -> Result<Forwarded> {
        let url = format!("{}{}", self.base_url, path_and_query);
        let req = self.apply_auth(self.client.request(method.clone(), &url), bearer);
        tracing::debug!(%method, url, "forwarding to backend");

        let resp = req
            .send()
            .await
            .map_err(|e| SchoolHubError::Http(format!("{method} {url} failed: {e}")))?;
        let status = resp.status().as_u16();
        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let body = resp
            .bytes()
            .await
            .map_err(|e| SchoolHubError::Http(format!("Read body failed: {e}")))?
            .to_vec();

        Ok(Forwarded {
            status,
            content_type,
            body,
        })
    }
}

/// Path of `resource` followed by `segments`, each percent-encoded as exactly
/// one path segment (`/` becomes `%2F`). Blank and dot segments are rejected.
pub fn resource_path(resource: Resource, segments: &[&str]) -> Result<String> {
    if let Some(bad) = segments
        .iter()
        .find(|s| s.trim().is_empty() || **s == "." || **s == "..")
    {
        return Err(SchoolHubError::Validation(format!("invalid id {bad:?}")));
    }
    let mut url = reqwest::Url::parse("http://backend/")
        .map_err(|e| SchoolHubError::Config(format!("URL error: {e}")))?;
    url.path_segments_mut()
        .map_err(|()| SchoolHubError::Config("URL cannot take a path".into()))?
        .clear()
        .extend(resource.name().split('/'))
        .extend(segments);
    Ok(url.path().to_string())
}

fn decode<T: DeserializeOwned>(url: &str, text: &str) -> Result<T> {
    serde_json::from_str(text).map_err(|e| {
        tracing::warn!(url, error = %e, "response did not match expected schema");
        SchoolHubError::Decode(format!("{url}: {e}"))
    })
}

/// The human-readable message of an error body.
///
/// Looks at `message` (a string, or the first string of an array, as
/// validation pipes produce), then `error`, then falls back to the raw text.
fn extract_message(text: &str) -> Option<String> {
    if let Ok(json) = serde_json::from_str::<Value>(text) {
        let from_message = match &json["message"] {
            Value::String(s) => Some(s.clone()),
            Value::Array(items) => items.iter().find_map(|v| v.as_str().map(String::from)),
            _ => None,
        };
        if let Some(msg) = from_message.or_else(|| json["error"].as_str().map(String::from)) {
            return Some(msg);
        }
    }
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
