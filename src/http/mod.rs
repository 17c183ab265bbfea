//! HTTP protocol layer module
//!
//! Body types and response builders shared by static file serving and the
//! upstream proxy.

pub mod mime;
pub mod response;

use http_body_util::combinators::UnsyncBoxBody;
use hyper::body::Bytes;

/// Boxed error accepted by the upstream client for request bodies
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Body of every response handed back to hyper
///
/// Synthesized bodies never fail; proxied bodies carry the upstream
/// connection's errors.
pub type ResponseBody = UnsyncBoxBody<Bytes, hyper::Error>;

/// Body of requests forwarded upstream
pub type UpstreamBody = UnsyncBoxBody<Bytes, BoxError>;

// Re-export commonly used builders
pub use response::{build_404_response, build_file_response, build_server_error_response};
