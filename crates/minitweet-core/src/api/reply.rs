use serde::de::DeserializeOwned;
use serde_json::Value;

/// Maximum length for raw bodies carried in log messages and reasons
const MAX_RAW_BODY_LENGTH: usize = 200;

/// A decoded response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// The body parsed as JSON (object, array, or primitive)
    Json(Value),
    /// The body was not JSON and is returned unchanged
    Text(String),
}

/// Classification of a reply against the shape a flow expects.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// The success marker was present
    Accepted(T),
    /// Well-formed JSON without the success marker
    Rejected(String),
    /// The body was not JSON at all
    Malformed(String),
}

impl Reply {
    /// Decode a raw body. Parse failures keep the text as-is.
    pub fn from_body(text: String) -> Self {
        match serde_json::from_str(&text) {
            Ok(value) => Reply::Json(value),
            Err(_) => Reply::Text(text),
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Reply::Json(value) => Some(value),
            Reply::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Reply::Json(_) => None,
            Reply::Text(text) => Some(text),
        }
    }

    /// Accept the reply if it is an object with a non-null `name` field.
    /// The accepted payload is that field's value.
    pub fn require_field(self, name: &str) -> Outcome<Value> {
        match self {
            Reply::Json(Value::Object(mut map)) => match map.remove(name) {
                Some(value) if !value.is_null() => Outcome::Accepted(value),
                _ => Outcome::Rejected(rejection_reason(&Value::Object(map))),
            },
            Reply::Json(other) => Outcome::Rejected(rejection_reason(&other)),
            Reply::Text(text) => Outcome::Malformed(text),
        }
    }

    /// Accept the reply if it is a JSON array whose elements all decode as `T`.
    pub fn require_array<T: DeserializeOwned>(self) -> Outcome<Vec<T>> {
        match self {
            Reply::Json(value @ Value::Array(_)) => match serde_json::from_value(value) {
                Ok(items) => Outcome::Accepted(items),
                Err(e) => Outcome::Rejected(format!("unexpected element shape: {}", e)),
            },
            Reply::Json(other) => Outcome::Rejected(rejection_reason(&other)),
            Reply::Text(text) => Outcome::Malformed(text),
        }
    }
}

impl<T> Outcome<T> {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Outcome::Accepted(_))
    }

    pub fn accepted(self) -> Option<T> {
        match self {
            Outcome::Accepted(value) => Some(value),
            _ => None,
        }
    }

    /// Short description of why the reply was not accepted, for logging
    pub fn reason(&self) -> Option<String> {
        match self {
            Outcome::Accepted(_) => None,
            Outcome::Rejected(reason) => Some(reason.clone()),
            Outcome::Malformed(raw) => Some(format!("non-JSON body: {}", truncate_raw(raw.trim()))),
        }
    }
}

/// Pull a human-readable reason out of a JSON reply that lacked the marker
fn rejection_reason(value: &Value) -> String {
    let from_field = value
        .get("error")
        .or_else(|| value.get("message"))
        .and_then(Value::as_str);

    match from_field {
        Some(reason) => reason.to_string(),
        None => format!("unexpected response: {}", truncate_raw(&value.to_string())),
    }
}

fn truncate_raw(raw: &str) -> String {
    if raw.len() <= MAX_RAW_BODY_LENGTH {
        raw.to_string()
    } else {
        let cut: String = raw.chars().take(MAX_RAW_BODY_LENGTH).collect();
        format!("{}... ({} total bytes)", cut, raw.len())
    }
}
