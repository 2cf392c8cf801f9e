use std::collections::BTreeMap;
use std::fmt;

use reqwest::blocking::{Client, RequestBuilder, multipart::Form};
use serde_json::Value;

use crate::EDITOR_BASE_URL;

/// Browser User-Agent sent unless the config overrides it.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
}

impl Method {
    /// GET only accepts 200; POST and PUT also accept 201.
    pub fn accepts(self, status: u16) -> bool {
        match self {
            Method::Get => status == 200,
            Method::Post | Method::Put => matches!(status, 200 | 201),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error("Failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    #[error("{method} {url} failed: {source}")]
    Transport {
        method: Method,
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// A completed exchange. Non-success statuses are not errors at this level.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
    /// `body` parsed as JSON, when it is JSON.
    pub json: Option<Value>,
    success: bool,
}

impl HttpResponse {
    pub fn new(method: Method, status: u16, body: String) -> Self {
        let json = serde_json::from_str(&body).ok();
        Self {
            status,
            json,
            body,
            success: method.accepts(status),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }
}

/// Blocking client that sends the editor headers and session cookies with
/// every request except [`HttpClient::post_multipart_bare`].
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    user_agent: String,
    cookie_header: Option<String>,
}

impl HttpClient {
    pub fn new(user_agent: Option<&str>) -> Result<Self, HttpError> {
        let client = Client::builder().build().map_err(HttpError::Build)?;
        Ok(Self {
            client,
            user_agent: user_agent.unwrap_or(DEFAULT_USER_AGENT).to_string(),
            cookie_header: None,
        })
    }

    pub fn set_cookies(&mut self, cookies: &BTreeMap<String, String>) {
        self.cookie_header = cookie_header(cookies);
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn get(&self, url: &str) -> Result<HttpResponse, HttpError> {
        let request = self.with_base(self.client.get(url));
        self.send(Method::Get, url, request)
    }

    /// GET carrying only the User-Agent, for public pages.
    pub fn get_public(&self, url: &str) -> Result<HttpResponse, HttpError> {
        let request = self.with_user_agent(self.client.get(url));
        self.send(Method::Get, url, request)
    }

    pub fn post_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &Value,
    ) -> Result<HttpResponse, HttpError> {
        let request = with_headers(self.with_base(self.client.post(url)), headers).json(body);
        self.send(Method::Post, url, request)
    }

    pub fn put_json(&self, url: &str, body: &Value) -> Result<HttpResponse, HttpError> {
        let request = self.with_base(self.client.put(url)).json(body);
        self.send(Method::Put, url, request)
    }

    pub fn post_multipart(&self, url: &str, form: Form) -> Result<HttpResponse, HttpError> {
        let request = self.with_base(self.client.post(url)).multipart(form);
        self.send(Method::Post, url, request)
    }

    /// Multipart POST without base headers or cookies, for third-party storage.
    pub fn post_multipart_bare(&self, url: &str, form: Form) -> Result<HttpResponse, HttpError> {
        let request = self.client.post(url).multipart(form);
        self.send(Method::Post, url, request)
    }

    fn with_user_agent(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(reqwest::header::USER_AGENT, &self.user_agent)
    }

    fn with_base(&self, request: RequestBuilder) -> RequestBuilder {
        let request = self
            .with_user_agent(request)
            .header(reqwest::header::ORIGIN, EDITOR_BASE_URL)
            .header("X-Requested-With", "XMLHttpRequest");
        match &self.cookie_header {
            Some(cookies) => request.header(reqwest::header::COOKIE, cookies),
            None => request,
        }
    }

    fn send(
        &self,
        method: Method,
        url: &str,
        request: RequestBuilder,
    ) -> Result<HttpResponse, HttpError> {
        let transport = |source| HttpError::Transport {
            method,
            url: url.to_string(),
            source,
        };

        log::debug!("{method} {url}");
        let response = request.send().map_err(transport)?;
        let status = response.status().as_u16();
        let body = response.text().map_err(transport)?;
        log::debug!("{method} {url} -> {status}");

        Ok(HttpResponse::new(method, status, body))
    }
}

fn with_headers(request: RequestBuilder, headers: &[(&str, &str)]) -> RequestBuilder {
    headers
        .iter()
        .fold(request, |request, (name, value)| request.header(*name, *value))
}

/// `name=value` pairs joined with `; `, or `None` when there are no cookies.
pub fn cookie_header(cookies: &BTreeMap<String, String>) -> Option<String> {
    if cookies.is_empty() {
        return None;
    }
    let pairs: Vec<String> = cookies
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect();
    Some(pairs.join("; "))
}
