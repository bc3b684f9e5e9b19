//! Window identifiers and best-effort extraction from responses.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Response, ResponseShape};

/// Non-empty handle naming a window managed by the server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WindowId(String);

impl WindowId {
    /// Wraps `value`, returning `None` when it is empty.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let text = value.into();
        if text.is_empty() {
            None
        } else {
            Some(Self(text))
        }
    }

    /// Borrows the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for WindowId {
    type Error = &'static str;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value).ok_or("window id must not be empty")
    }
}

impl From<WindowId> for String {
    fn from(id: WindowId) -> Self {
        id.0
    }
}

impl AsRef<str> for WindowId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// Finds the first window identifier a response offers.
///
/// Resolution order, first match wins:
///
/// 1. `result` is a non-empty array: its first element, either as a bare
///    string or via the `window_id`, `id`, `windowId` keys of an object.
/// 2. `result` is an object with a non-empty `windows` array whose first
///    element is a string or object: resolved as in step 1.
/// 3. `result` is any other object: the same keys looked up on it directly.
///
/// Every other shape yields `None`. The function never fails.
#[must_use]
pub fn extract_window_id(response: &Response) -> Option<WindowId> {
    match response.shape() {
        ResponseShape::Listing(entry) | ResponseShape::Nested(entry) => entry.window_id(),
        ResponseShape::Record(record) => record.window_id(),
        ResponseShape::Empty => None,
    }
}
