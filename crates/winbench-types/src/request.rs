//! Request objects sent to the window server.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::WindowId;

/// Value carried in the `jsonrpc` field of every request.
pub const PROTOCOL_VERSION: &str = "2.0";

/// Methods understood by the window server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Method {
    /// Enumerates the windows the server currently manages.
    ListWindows,
    /// Opens a new window with the supplied startup arguments.
    CreateWindow,
    /// Raises and focuses an existing window.
    ActivateWindow,
}

impl Method {
    /// Returns the method name as it appears on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ListWindows => "ListWindows",
            Self::CreateWindow => "CreateWindow",
            Self::ActivateWindow => "ActivateWindow",
        }
    }

    /// Request `id` used at this method's call site.
    ///
    /// Every exchange runs over its own connection, so the tag only helps a
    /// human match requests in server logs; it is not a correlation key.
    #[must_use]
    pub const fn call_site(self) -> u32 {
        match self {
            Self::ListWindows => 1,
            Self::CreateWindow => 2,
            Self::ActivateWindow => 3,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Method-specific request parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Params {
    /// Parameters for [`Method::CreateWindow`].
    CreateWindow {
        /// Startup arguments handed to the editor in the new window.
        nvim_args: Vec<String>,
    },
    /// Parameters for [`Method::ActivateWindow`].
    ActivateWindow {
        /// Window to bring to the foreground.
        window_id: WindowId,
    },
}

/// A single JSON-RPC request. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    #[serde(rename = "jsonrpc")]
    protocol_version: String,
    id: u32,
    method: Method,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    params: Option<Params>,
}

impl Request {
    fn new(method: Method, params: Option<Params>) -> Self {
        Self {
            protocol_version: PROTOCOL_VERSION.to_owned(),
            id: method.call_site(),
            method,
            params,
        }
    }

    /// Builds a parameterless `ListWindows` request.
    #[must_use]
    pub fn list_windows() -> Self {
        Self::new(Method::ListWindows, None)
    }

    /// Builds a `CreateWindow` request carrying the editor startup arguments.
    #[must_use]
    pub fn create_window(nvim_args: Vec<String>) -> Self {
        Self::new(Method::CreateWindow, Some(Params::CreateWindow { nvim_args }))
    }

    /// Builds an `ActivateWindow` request targeting `window_id`.
    #[must_use]
    pub fn activate_window(window_id: WindowId) -> Self {
        Self::new(
            Method::ActivateWindow,
            Some(Params::ActivateWindow { window_id }),
        )
    }

    /// Protocol version advertised in the `jsonrpc` field.
    #[must_use]
    pub fn protocol_version(&self) -> &str {
        &self.protocol_version
    }

    /// Call-site tag carried in the `id` field.
    #[must_use]
    pub const fn id(&self) -> u32 {
        self.id
    }

    /// Method invoked by this request.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Method parameters, if any.
    #[must_use]
    pub const fn params(&self) -> Option<&Params> {
        self.params.as_ref()
    }

    /// Encodes the request as one JSON line terminated by `\n`.
    ///
    /// # Errors
    ///
    /// Returns the serialiser error if the request cannot be encoded.
    pub fn encode_line(&self) -> serde_json::Result<Vec<u8>> {
        let mut line = serde_json::to_vec(self)?;
        line.push(b'\n');
        Ok(line)
    }
}
