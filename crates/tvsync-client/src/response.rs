//! Interpretation of TilesView response bodies.
//!
//! The API is inconsistent about its envelope: the remote id may sit at the
//! top level, under `data`, or under `data.data`, and success may be signalled
//! by a `success` flag at either of the first two levels. Some 2xx responses
//! match none of these shapes.

use serde_json::Value;

/// Which known envelope a 2xx body matched, checked in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeShape {
    /// `{"data": {"success": true, ...}}`
    DataSuccess,
    /// `{"success": true, ...}`
    Success,
    /// `{"tv_prod_id": ...}` without a success flag.
    RemoteId,
    /// None of the above.
    ///
    /// Accepted as success under the `treat_unrecognized_2xx_as_success` rule:
    /// the HTTP status is authoritative and the body is passed through.
    Unrecognized,
}

impl EnvelopeShape {
    #[must_use]
    pub fn classify(body: &Value) -> Self {
        if body.pointer("/data/success") == Some(&Value::Bool(true)) {
            EnvelopeShape::DataSuccess
        } else if body.get("success") == Some(&Value::Bool(true)) {
            EnvelopeShape::Success
        } else if body.get("tv_prod_id").is_some_and(|v| !v.is_null()) {
            EnvelopeShape::RemoteId
        } else {
            EnvelopeShape::Unrecognized
        }
    }
}

/// A successful (200/201) TilesView response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    /// Decoded JSON body; `Null` if the body was empty or not JSON.
    pub body: Value,
    pub shape: EnvelopeShape,
}

/// The normalized `{ok, remote_id}` view of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpretation {
    pub ok: bool,
    pub remote_id: Option<String>,
}

impl ApiResponse {
    #[must_use]
    pub fn new(status: u16, body: Value) -> Self {
        let shape = EnvelopeShape::classify(&body);
        Self {
            status,
            body,
            shape,
        }
    }

    #[must_use]
    pub fn remote_id(&self) -> Option<String> {
        extract_remote_id(&self.body)
    }

    /// Every `ApiResponse` is a 2xx, so `ok` is always true; unrecognized
    /// shapes included.
    #[must_use]
    pub fn interpret(&self) -> Interpretation {
        Interpretation {
            ok: true,
            remote_id: self.remote_id(),
        }
    }
}

/// Extracts the remote id from `tv_prod_id`, `data.tv_prod_id`, or
/// `data.data.tv_prod_id`, returning the first non-empty match.
///
/// Numeric ids are rendered as decimal strings. Empty strings, `"0"`, `0`,
/// booleans, and `null` are treated as absent.
#[must_use]
pub fn extract_remote_id(body: &Value) -> Option<String> {
    ["/tv_prod_id", "/data/tv_prod_id", "/data/data/tv_prod_id"]
        .iter()
        .filter_map(|pointer| body.pointer(pointer))
        .find_map(non_empty_id)
}

fn non_empty_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty() && s != "0").then(|| s.to_owned())
        }
        Value::Number(n) => {
            let is_zero = n.as_i64() == Some(0)
                || n.as_u64() == Some(0)
                || n.as_f64().is_some_and(|f| f.abs() < f64::EPSILON);
            if is_zero {
                None
            } else {
                Some(n.to_string())
            }
        }
        _ => None,
    }
}
