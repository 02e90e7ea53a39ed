//! Target URL construction.
//!
//! # Design
//! A path that already parses as an absolute URL wins over the client's
//! base; anything else is plain concatenation. Query parameters are an
//! ordered mapping: entries keep their first-insertion position, a repeated
//! name overwrites the earlier value, and null values are dropped. The same
//! mapping in the same order always serializes to the same bytes.

use serde_json::Value;
// Leading `::` disambiguates the url crate from this module.
use ::url::form_urlencoded;
use ::url::Url;

/// Ordered query parameter mapping. Values are JSON primitives; `Null`
/// entries are skipped during serialization.
pub type Params = Vec<(String, Value)>;

/// Compose a target URL from a base, a path, and optional query parameters.
pub fn build_url(base: &str, path: &str, params: Option<&Params>) -> String {
    // An absolute path is already fully qualified.
    let base = if Url::parse(path).is_ok() { "" } else { base };
    let mut url = format!("{base}{path}");

    let Some(params) = params else {
        return url;
    };
    if params.is_empty() {
        return url;
    }

    // Repeated names keep the first position and take the last value.
    let mut pairs: Vec<(&str, String)> = Vec::new();
    for (name, value) in params {
        let Some(value) = primitive_to_string(value) else {
            continue;
        };
        match pairs.iter_mut().find(|(existing, _)| *existing == name) {
            Some(pair) => pair.1 = value,
            None => pairs.push((name, value)),
        }
    }

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (name, value) in &pairs {
        serializer.append_pair(name, value);
    }

    url.push('?');
    url.push_str(&serializer.finish());
    url
}

/// String form of a query primitive; `None` for null values.
fn primitive_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
