//! Request snapshots and the host-facing request seam.

use crate::codec::HeaderList;
use crate::relay::error::{RelayError, RelayResult};
use crate::relay::rewriter::RewrittenRequest;

/// Immutable snapshot of an intercepted request, taken before any rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedRequest {
    scheme: String,
    host: String,
    path: String,
    method: String,
    headers: HeaderList,
    cookie: Option<String>,
    body: Vec<u8>,
}

impl CapturedRequest {
    /// Build a snapshot. The cookie value is taken from the `Cookie` header;
    /// several `Cookie` headers are joined with `"; "`.
    pub fn new(
        scheme: impl Into<String>,
        host: impl Into<String>,
        path: impl Into<String>,
        method: impl Into<String>,
        headers: HeaderList,
        body: impl Into<Vec<u8>>,
    ) -> Self {
        let cookies: Vec<&str> = headers.get_all("cookie").collect();
        let cookie = (!cookies.is_empty()).then(|| cookies.join("; "));
        Self {
            scheme: scheme.into(),
            host: host.into(),
            path: path.into(),
            method: method.into(),
            headers,
            cookie,
            body: body.into(),
        }
    }

    /// Snapshot a live host object. Fails if the host cannot supply a field.
    pub fn capture<R: InterceptedRequest + ?Sized>(request: &R) -> RelayResult<Self> {
        let scheme = request.scheme().ok_or_else(|| missing("scheme"))?;
        let host = request.host().filter(|h| !h.is_empty()).ok_or_else(|| missing("host"))?;
        let path = request.path().ok_or_else(|| missing("path"))?;
        let method = request.method().ok_or_else(|| missing("method"))?;
        Ok(Self::new(scheme, host, path, method, request.headers(), request.body()))
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn headers(&self) -> &HeaderList {
        &self.headers
    }

    pub fn cookie(&self) -> Option<&str> {
        self.cookie.as_deref()
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Original destination: `scheme://host` followed by the path.
    pub fn uri(&self) -> String {
        format!("{}://{}{}", self.scheme, self.host, self.path)
    }
}

fn missing(field: &str) -> RelayError {
    RelayError::HostIntegration(format!("request is missing {}", field))
}

/// A request object owned by an interception host.
///
/// Getters return `None` when the host cannot provide the field. `apply`
/// takes every field of the rewrite at once.
pub trait InterceptedRequest {
    fn scheme(&self) -> Option<String>;
    fn host(&self) -> Option<String>;
    fn path(&self) -> Option<String>;
    fn method(&self) -> Option<String>;
    fn headers(&self) -> HeaderList;
    fn body(&self) -> Vec<u8>;

    /// Overwrite the request with the rewritten values.
    fn apply(&mut self, rewritten: &RewrittenRequest);
}
