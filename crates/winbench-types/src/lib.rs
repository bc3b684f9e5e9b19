//! Wire vocabulary shared by the window-server benchmark.
//!
//! Requests are single-line JSON-RPC objects; responses are parsed
//! defensively into a small set of known shapes so that identifier
//! extraction can be a pure pattern match rather than ad-hoc probing.

mod request;
mod response;
mod window_id;

pub use request::{Method, PROTOCOL_VERSION, Params, Request};
pub use response::{Response, ResponseShape, WindowEntry, WindowRecord};
pub use window_id::{WindowId, extract_window_id};
