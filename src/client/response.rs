//! Response shapes and text extraction.
//!
//! Inference responses come in several loosely related JSON shapes. Each
//! style classifies the body into a [`ResponseShape`] following a fixed
//! precedence, then [`ResponseShape::into_text`] renders it. A missing field
//! only moves classification to the next candidate; it is never an error.
//!
//! A field counts as missing when it is absent or JSON-falsy: `null`,
//! `false`, `0`, `""`, `[]` or `{}`.

use serde_json::{Map, Value};

/// Where the generated text was found.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseShape<'a> {
    /// `choices[0].message` object.
    Message(&'a Map<String, Value>),
    /// `choices[0].delta` object.
    Delta(&'a Map<String, Value>),
    /// `choices[0].text`.
    ChoiceText(&'a Value),
    /// `choices[0]` itself, when it has no usable text.
    OpaqueChoice(&'a Value),
    /// Top-level `text`.
    BodyText(&'a Value),
    /// Top-level `generated_text`.
    GeneratedText(&'a Value),
    /// Nothing recognizable; the whole body.
    Opaque(&'a Value),
}

impl<'a> ResponseShape<'a> {
    /// Classify a chat-completion body.
    ///
    /// Precedence: `message`, `delta`, choice `text`, then [`Self::body_fields`].
    #[must_use]
    pub fn chat(body: &'a Value) -> Self {
        if let Some(choice) = first_choice(body).and_then(Value::as_object) {
            if let Some(message) = present(choice, "message") {
                if let Value::Object(fields) = message {
                    return Self::Message(fields);
                }
            } else if let Some(Value::Object(fields)) = present(choice, "delta") {
                return Self::Delta(fields);
            }
            if let Some(text) = present(choice, "text") {
                return Self::ChoiceText(text);
            }
        }
        Self::body_fields(body)
    }

    /// Classify a legacy text-completion body.
    ///
    /// Precedence: choice `text`, the choice itself, then the whole body.
    #[must_use]
    pub fn completion(body: &'a Value) -> Self {
        match first_choice(body) {
            Some(choice) => choice
                .as_object()
                .and_then(|fields| present(fields, "text"))
                .map_or(Self::OpaqueChoice(choice), Self::ChoiceText),
            None => Self::Opaque(body),
        }
    }

    /// Classify using only top-level `text` and `generated_text`.
    #[must_use]
    pub fn body_fields(body: &'a Value) -> Self {
        let fields = body.as_object();
        if let Some(text) = fields.and_then(|f| present(f, "text")) {
            return Self::BodyText(text);
        }
        if let Some(text) = fields.and_then(|f| present(f, "generated_text")) {
            return Self::GeneratedText(text);
        }
        Self::Opaque(body)
    }

    /// Render the shape as text.
    ///
    /// Message and delta objects yield their `content`, or the whole object
    /// when it has none.
    #[must_use]
    pub fn into_text(self) -> String {
        match self {
            Self::Message(fields) | Self::Delta(fields) => present(fields, "content")
                .map_or_else(|| Value::Object(fields.clone()).to_string(), render),
            Self::ChoiceText(value)
            | Self::OpaqueChoice(value)
            | Self::BodyText(value)
            | Self::GeneratedText(value)
            | Self::Opaque(value) => render(value),
        }
    }
}

/// First element of a non-empty `choices` array.
fn first_choice(body: &Value) -> Option<&Value> {
    body.get("choices")?.as_array()?.first()
}

/// A field that is present and truthy.
fn present<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    fields.get(key).filter(|value| is_truthy(value))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f.abs() > 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

/// Strings verbatim, everything else as compact JSON.
fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
