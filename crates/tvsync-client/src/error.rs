use thiserror::Error;

/// Errors returned by the TilesView transport client.
#[derive(Debug, Error)]
pub enum TransportError {
    /// App key or app secret is empty. No request was sent.
    #[error("TilesView app key or app secret is not configured")]
    MissingCredentials,

    /// The request never produced an HTTP status: DNS, TLS, connect,
    /// timeout, or a failure while reading the body.
    #[error("network error calling {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a status other than 200 or 201.
    #[error("unexpected HTTP status {status} from {url}")]
    Http {
        status: u16,
        url: String,
        body: String,
    },

    /// A batch call exceeded the per-request item limit. No request was sent.
    #[error("{kind} batch of {len} items exceeds the {max}-item limit")]
    BatchTooLarge {
        kind: &'static str,
        len: usize,
        max: usize,
    },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("failed to serialize payload for {context}: {source}")]
    Serialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Coarse classification of a [`TransportError::Network`] failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkErrorKind {
    Timeout,
    Connect,
    Body,
    Request,
    Other,
}

impl std::fmt::Display for NetworkErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            NetworkErrorKind::Timeout => "timeout",
            NetworkErrorKind::Connect => "connect",
            NetworkErrorKind::Body => "body",
            NetworkErrorKind::Request => "request",
            NetworkErrorKind::Other => "other",
        };
        f.write_str(s)
    }
}

impl TransportError {
    /// `None` unless this is a [`TransportError::Network`].
    #[must_use]
    pub fn network_kind(&self) -> Option<NetworkErrorKind> {
        let TransportError::Network { source, .. } = self else {
            return None;
        };
        let kind = if source.is_timeout() {
            NetworkErrorKind::Timeout
        } else if source.is_connect() {
            NetworkErrorKind::Connect
        } else if source.is_body() || source.is_decode() {
            NetworkErrorKind::Body
        } else if source.is_request() || source.is_builder() {
            NetworkErrorKind::Request
        } else {
            NetworkErrorKind::Other
        };
        Some(kind)
    }

    /// HTTP status for [`TransportError::Http`], otherwise `None`.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
