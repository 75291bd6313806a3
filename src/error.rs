//! Error types for the browser and its endpoint boundary.
//!
//! Endpoints return [`ApiError`], the single normalized shape of a failed
//! server interaction. The controller wraps it in [`BrowserError`] together
//! with its own state-validation failures.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Field-keyed validation messages plus an optional global message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldErrors {
    pub message: Option<String>,
    pub fields: BTreeMap<String, Vec<String>>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// A validation failure with only a global message.
    pub fn global(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            fields: BTreeMap::new(),
        }
    }

    /// Add a message for a field (builder style).
    pub fn with_field(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.fields
            .entry(field.into())
            .or_default()
            .push(message.into());
        self
    }

    /// Messages for one field, empty if the field has none.
    pub fn field(&self, name: &str) -> &[String] {
        self.fields.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.message.is_none() && self.fields.is_empty()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(message) = &self.message {
            write!(f, "{}", message)?;
        }
        for (i, (field, messages)) in self.fields.iter().enumerate() {
            if i > 0 || self.message.is_some() {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", field, messages.join(", "))?;
        }
        Ok(())
    }
}

/// Normalized error returned by a [`ResourceEndpoint`](crate::ResourceEndpoint).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Network failure, timeout, or an unexpected server response.
    #[error("transport error: {0}")]
    Transport(String),
    /// The server rejected the payload.
    #[error("validation failed: {0}")]
    Validation(FieldErrors),
    /// The targeted resource no longer exists.
    #[error("not found: {0}")]
    NotFound(String),
}

impl ApiError {
    /// Normalize a non-success HTTP response into an `ApiError`.
    ///
    /// Accepts the body shapes servers actually send: a bare string,
    /// `{"message": ...}`, or `{"errors": {field: [msgs] | msg}}` (with or
    /// without a top-level message).
    pub fn from_response(status: u16, body: &Value) -> Self {
        let message = body_message(body);
        match status {
            404 => ApiError::NotFound(message.unwrap_or_else(|| "resource not found".into())),
            400 | 409 | 422 => {
                let mut errors = FieldErrors {
                    message,
                    fields: BTreeMap::new(),
                };
                if let Some(fields) = body.get("errors").and_then(Value::as_object) {
                    for (field, messages) in fields {
                        let list = match messages {
                            Value::Array(items) => items.iter().map(value_text).collect(),
                            other => vec![value_text(other)],
                        };
                        errors.fields.insert(field.clone(), list);
                    }
                }
                if errors.is_empty() {
                    errors.message = Some(format!("request rejected with status {}", status));
                }
                ApiError::Validation(errors)
            }
            _ => ApiError::Transport(match message {
                Some(m) => format!("status {}: {}", status, m),
                None => format!("status {}", status),
            }),
        }
    }

    /// HTTP-style status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::Transport(_) => 503,
            ApiError::Validation(_) => 422,
            ApiError::NotFound(_) => 404,
        }
    }
}

fn body_message(body: &Value) -> Option<String> {
    match body {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Object(map) => map
            .get("message")
            .or_else(|| map.get("error"))
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Error type for browser operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BrowserError {
    /// The endpoint call failed.
    #[error(transparent)]
    Api(#[from] ApiError),
    /// The facet is not declared by the resource schema.
    #[error("unknown facet: {0}")]
    UnknownFacet(String),
    /// The value is not in the facet's allow-list.
    #[error("invalid value {value:?} for facet {facet}")]
    InvalidFacetValue { facet: String, value: String },
    /// The field is not in the resource's sortable set.
    #[error("field is not sortable: {0}")]
    UnsortableField(String),
    /// The page size is not in the resource's allow-list.
    #[error("page size not allowed: {0}")]
    InvalidPageSize(u32),
    /// Page numbers start at 1.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),
    /// An identical mutation is already in flight.
    #[error("{kind} already in flight for {target}")]
    DuplicateMutation { kind: String, target: String },
    /// The browser has been unmounted.
    #[error("browser is unmounted")]
    Unmounted,
    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl BrowserError {
    /// True when the target resource no longer exists on the server.
    pub fn is_not_found(&self) -> bool {
        matches!(self, BrowserError::Api(ApiError::NotFound(_)))
    }

    /// Field-keyed messages of a validation failure.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            BrowserError::Api(ApiError::Validation(errors)) => Some(errors),
            _ => None,
        }
    }
}
