//! Stable identities for outbound HTTP calls.
//!
//! A key has the shape `METHOD|URL|sortedParams|serializedBody`. Parameters are
//! held in a `BTreeMap`, so two calls that differ only in parameter insertion
//! order produce the same key.

use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

use serde_json::Value;

/// Segment delimiter; not expected inside URLs or compact JSON.
const SEGMENT_DELIMITER: &str = "|";

/// Query parameters keyed by name, iterated in lexicographic order.
pub type QueryParams = BTreeMap<String, Value>;

/// Identity of a logical request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestKey(String);

impl RequestKey {
    /// Borrow the key text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the key, returning its text.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl Display for RequestKey {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

impl From<&str> for RequestKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for RequestKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Derive the key for a request.
///
/// The method is upper-cased and the URL is used verbatim. When `params` is
/// present its entries contribute one `name=JSON(value)` segment joined by `&`
/// (an empty map still contributes an empty segment). A body contributes its
/// compact JSON serialization unless it is absent or falsy (`null`, `false`,
/// `0`, `""`).
#[must_use]
pub fn generate_key(
    method: &str,
    url: &str,
    params: Option<&QueryParams>,
    body: Option<&Value>,
) -> RequestKey {
    let mut parts = vec![method.to_uppercase(), url.to_string()];

    if let Some(params) = params {
        let sorted = params
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("&");
        parts.push(sorted);
    }

    if let Some(body) = body.filter(|body| !is_falsy(body)) {
        parts.push(body.to_string());
    }

    RequestKey(parts.join(SEGMENT_DELIMITER))
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n == 0.0),
        Value::String(text) => text.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}
