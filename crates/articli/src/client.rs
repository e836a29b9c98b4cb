use std::fmt;

use anyhow::Context;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde::Serialize;
use ureq::{Agent, RequestBuilder};

use crate::error::{Error, Result};
use crate::format;

const API_KEY_HEADER: &str = "X-JFrog-Art-Api";
const USER_AGENT: &str = concat!("articli/", env!("CARGO_PKG_VERSION"));

/// Characters that must be percent-encoded in a URL path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS.add(b' ').add(b'#').add(b'%').add(b'/').add(b'?');

fn encode_path(s: &str) -> String {
    utf8_percent_encode(s, PATH_SEGMENT).to_string()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        })
    }
}

/// A fully built request: absolute URL, headers and optional JSON body.
#[derive(Clone, Debug)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
    pub body: Option<Vec<u8>>,
}

impl Request {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Clone, Debug)]
pub struct Response {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Performs exactly one network round-trip per call.
pub trait Transport {
    fn send(&self, request: Request) -> anyhow::Result<Response>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: Request) -> anyhow::Result<Response> {
        (**self).send(request)
    }
}

/// Blocking transport backed by a `ureq` agent with default timeouts.
pub struct UreqTransport {
    agent: Agent,
}

impl Default for UreqTransport {
    fn default() -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .into();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: Request) -> anyhow::Result<Response> {
        let Request {
            method,
            url,
            headers,
            body,
        } = request;

        let result = match method {
            Method::Get => with_headers(self.agent.get(&url), &headers).call(),
            Method::Delete => with_headers(self.agent.delete(&url), &headers).call(),
            Method::Put => {
                let bytes = body.unwrap_or_default();
                with_headers(self.agent.put(&url), &headers).send(&bytes)
            }
        };

        let mut resp = result.context("request failed")?;
        let status = resp.status().as_u16();
        let body = resp
            .body_mut()
            .read_to_vec()
            .context("failed to read response body")?;
        Ok(Response { status, body })
    }
}

fn with_headers<B>(
    mut builder: RequestBuilder<B>,
    headers: &[(&'static str, String)],
) -> RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(*name, value.as_str());
    }
    builder
}

#[derive(Serialize)]
struct UserRecord<'a> {
    email: &'a str,
    password: &'a str,
}

pub struct ArtifactoryClient<T = UreqTransport> {
    transport: T,
    base_url: String,
    api_key: String,
}

impl<T> fmt::Debug for ArtifactoryClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArtifactoryClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[redacted]")
            .finish()
    }
}

impl ArtifactoryClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self::with_transport(UreqTransport::default(), base_url, api_key)
    }
}

impl<T: Transport> ArtifactoryClient<T> {
    /// `base_url` and `api_key` are expected to have passed `crate::validate`.
    pub fn with_transport(transport: T, base_url: &str, api_key: &str) -> Self {
        Self {
            transport,
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn send(&self, method: Method, path: &str, body: Option<Vec<u8>>) -> Result<String> {
        let url = format!("{}{path}", self.base_url);
        let request = Request {
            method,
            url: url.clone(),
            headers: vec![
                ("Content-Type", "application/json".to_string()),
                (API_KEY_HEADER, self.api_key.clone()),
                ("User-Agent", USER_AGENT.to_string()),
            ],
            body,
        };

        tracing::debug!(%method, %url, "sending request");
        let resp = self
            .transport
            .send(request)
            .with_context(|| format!("{method} {path}"))?;
        tracing::debug!(status = resp.status, %method, %url, "received response");

        handle_response(resp)
    }

    pub fn ping(&self) -> Result<String> {
        self.send(Method::Get, "/api/system/ping", None)
    }

    pub fn system_version(&self) -> Result<String> {
        self.send(Method::Get, "/api/system/version", None)
    }

    pub fn storage_info(&self) -> Result<String> {
        self.send(Method::Get, "/api/storageinfo", None)
    }

    /// Creates the user, or replaces an existing one with the same name.
    pub fn create_user(&self, username: &str, password: &str, email: &str) -> Result<String> {
        let body = serde_json::to_vec(&UserRecord { email, password })
            .context("failed to serialize request")?;
        self.send(Method::Put, &user_path(username), Some(body))
    }

    pub fn delete_user(&self, username: &str) -> Result<String> {
        self.send(Method::Delete, &user_path(username), None)
    }
}

fn user_path(username: &str) -> String {
    format!("/api/security/users/{}", encode_path(username))
}

/// 2xx bodies come back as text, untouched. Anything else becomes `Error::Http`.
fn handle_response(resp: Response) -> Result<String> {
    if (200..300).contains(&resp.status) {
        let text = String::from_utf8(resp.body).context("response body is not valid UTF-8")?;
        return Ok(text);
    }
    Err(Error::Http {
        status: resp.status,
        body: format::pretty_or_raw(&resp.body),
    })
}
