//! Request handler module
//!
//! Decides per request between serving a local asset, forwarding to the
//! upstream service, or answering with an error.

pub mod proxy;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
