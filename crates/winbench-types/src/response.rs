//! Responses received from the window server.
//!
//! The server's response schema is not pinned across methods or versions, so
//! a [`Response`] keeps the raw `result` value and classifies it on demand
//! into a [`ResponseShape`].

use serde_json::{Map, Value};

const WINDOWS_KEY: &str = "windows";
const ID_KEYS: [&str; 3] = ["window_id", "id", "windowId"];

/// A decoded reply. An empty response means "no usable answer".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Response {
    result: Option<Value>,
}

impl Response {
    /// A response carrying no result.
    #[must_use]
    pub const fn empty() -> Self {
        Self { result: None }
    }

    /// Decodes one JSON payload without its line terminator.
    ///
    /// Valid JSON that is not an object decodes to an empty response.
    ///
    /// # Errors
    ///
    /// Returns the parser error when `payload` is not valid JSON.
    pub fn decode(payload: &[u8]) -> serde_json::Result<Self> {
        let value: Value = serde_json::from_slice(payload)?;
        Ok(Self::from_value(value))
    }

    /// Builds a response from an already-parsed JSON value.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(mut fields) => Self {
                result: fields.remove("result"),
            },
            _ => Self::empty(),
        }
    }

    /// Returns the raw `result` value.
    #[must_use]
    pub const fn result(&self) -> Option<&Value> {
        self.result.as_ref()
    }

    /// Returns true when the response carried no `result`.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.result.is_none()
    }

    /// Classifies the `result` into one of the known shapes.
    #[must_use]
    pub fn shape(&self) -> ResponseShape<'_> {
        match self.result.as_ref() {
            Some(Value::Array(items)) => items
                .first()
                .map_or(ResponseShape::Empty, |first| {
                    ResponseShape::Listing(WindowEntry::from_value(first))
                }),
            Some(Value::Object(fields)) => classify_object(fields),
            _ => ResponseShape::Empty,
        }
    }
}

fn classify_object(fields: &Map<String, Value>) -> ResponseShape<'_> {
    let nested = fields
        .get(WINDOWS_KEY)
        .and_then(Value::as_array)
        .and_then(|windows| windows.first())
        .map(WindowEntry::from_value);
    match nested {
        Some(entry @ (WindowEntry::Handle(_) | WindowEntry::Record(_))) => {
            ResponseShape::Nested(entry)
        }
        _ => ResponseShape::Record(WindowRecord::from_fields(fields)),
    }
}

/// Known layouts of a response `result`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape<'a> {
    /// `result` is a non-empty array; holds its first element.
    Listing(WindowEntry<'a>),
    /// `result` is an object whose `windows` array starts with a string or
    /// object; holds that first element.
    Nested(WindowEntry<'a>),
    /// `result` is any other object.
    Record(WindowRecord<'a>),
    /// No result, an empty array, or a scalar.
    Empty,
}

/// One element of a window listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEntry<'a> {
    /// A bare string handle.
    Handle(&'a str),
    /// An object that may carry an identifier under an aliased key.
    Record(WindowRecord<'a>),
    /// Any other JSON value.
    Unrecognised,
}

impl<'a> WindowEntry<'a> {
    fn from_value(value: &'a Value) -> Self {
        match value {
            Value::String(handle) => Self::Handle(handle),
            Value::Object(fields) => Self::Record(WindowRecord::from_fields(fields)),
            _ => Self::Unrecognised,
        }
    }

    /// Identifier named by this entry, if any.
    #[must_use]
    pub fn window_id(&self) -> Option<crate::WindowId> {
        match self {
            Self::Handle(handle) => crate::WindowId::new(*handle),
            Self::Record(record) => record.window_id(),
            Self::Unrecognised => None,
        }
    }
}

/// Identifier candidates found on an object, one per accepted key.
///
/// Only non-empty strings count as present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowRecord<'a> {
    candidates: [Option<&'a str>; 3],
}

impl<'a> WindowRecord<'a> {
    fn from_fields(fields: &'a Map<String, Value>) -> Self {
        Self {
            candidates: ID_KEYS.map(|key| {
                fields
                    .get(key)
                    .and_then(Value::as_str)
                    .filter(|text| !text.is_empty())
            }),
        }
    }

    /// First present identifier in `window_id`, `id`, `windowId` order.
    #[must_use]
    pub fn window_id(&self) -> Option<crate::WindowId> {
        self.candidates
            .iter()
            .flatten()
            .next()
            .and_then(|text| crate::WindowId::new(*text))
    }
}
