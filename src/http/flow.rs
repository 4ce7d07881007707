//! Host-side request object.
//!
//! # Responsibilities
//! - Hold one buffered request in the form this host sends it
//! - Expose it to the relay core through `InterceptedRequest`
//! - Take the rewritten fields back in one assignment

use axum::body::Bytes;
use axum::http::{header, request::Parts};

use crate::codec::HeaderList;
use crate::http::request::X_RELAY_ID;
use crate::relay::{InterceptedRequest, RewrittenRequest};

/// A buffered request flowing through the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpFlow {
    pub scheme: String,
    /// `host[:port]`, from the absolute-form URI or the `Host` header.
    pub host: Option<String>,
    pub port: u16,
    /// Path and query.
    pub path: String,
    pub method: String,
    pub headers: HeaderList,
    pub body: Bytes,
}

impl HttpFlow {
    /// Build a flow from request parts and a buffered body.
    ///
    /// Scheme comes from an absolute-form URI, then `X-Forwarded-Proto`,
    /// defaulting to `http`. Header values that are not UTF-8 are converted
    /// lossily.
    pub fn from_parts(parts: &Parts, body: Bytes) -> Self {
        let headers: HeaderList = parts
            .headers
            .iter()
            .filter(|(name, _)| **name != X_RELAY_ID)
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();

        let scheme = parts
            .uri
            .scheme_str()
            .map(str::to_string)
            .or_else(|| headers.get("x-forwarded-proto").map(|p| p.trim().to_ascii_lowercase()))
            .unwrap_or_else(|| "http".to_string());

        let host = parts
            .uri
            .authority()
            .map(|a| a.as_str().to_string())
            .or_else(|| {
                parts
                    .headers
                    .get(header::HOST)
                    .and_then(|h| h.to_str().ok())
                    .map(str::to_string)
            })
            .filter(|h| !h.is_empty());

        let port = parts
            .uri
            .port_u16()
            .unwrap_or(if scheme == "https" { 443 } else { 80 });

        let path = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .filter(|pq| !pq.is_empty())
            .unwrap_or("/")
            .to_string();

        Self {
            scheme,
            host,
            port,
            path,
            method: parts.method.as_str().to_string(),
            headers,
            body,
        }
    }

    /// Absolute URL this flow is addressed to. The port is added only when
    /// `host` does not already name one.
    pub fn url(&self) -> Option<String> {
        let host = self.host.as_deref()?;
        if has_port(host) {
            Some(format!("{}://{}{}", self.scheme, host, self.path))
        } else {
            Some(format!("{}://{}:{}{}", self.scheme, host, self.port, self.path))
        }
    }
}

/// Whether `host` ends in `:port`. Colons inside an IPv6 literal do not count.
fn has_port(host: &str) -> bool {
    host.rfind(':').is_some_and(|idx| !host[idx..].contains(']'))
}

impl InterceptedRequest for HttpFlow {
    fn scheme(&self) -> Option<String> {
        Some(self.scheme.clone())
    }

    fn host(&self) -> Option<String> {
        self.host.clone()
    }

    fn path(&self) -> Option<String> {
        Some(self.path.clone())
    }

    fn method(&self) -> Option<String> {
        Some(self.method.clone())
    }

    fn headers(&self) -> HeaderList {
        self.headers.clone()
    }

    fn body(&self) -> Vec<u8> {
        self.body.to_vec()
    }

    fn apply(&mut self, rewritten: &RewrittenRequest) {
        self.scheme = rewritten.scheme.to_string();
        self.host = Some(rewritten.host.to_string());
        self.port = rewritten.port;
        self.path = rewritten.path.to_string();
        self.method = rewritten.method.to_string();
        self.headers = rewritten.headers.clone();
        self.body = Bytes::from(rewritten.body.clone());
    }
}
