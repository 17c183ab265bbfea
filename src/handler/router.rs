//! Request dispatch module
//!
//! Entry point for HTTP request processing. Every request is resolved to a
//! single [`RouteDecision`] which alone determines the response.

use crate::config::AppState;
use crate::handler::proxy;
use crate::handler::static_files::{self, FileOutcome};
use crate::http::{self, BoxError, ResponseBody};
use hyper::body::{Body, Bytes};
use hyper::{Request, Response};
use std::convert::Infallible;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// What to answer a request with
#[derive(Debug)]
pub enum RouteDecision {
    ServeFile {
        path: PathBuf,
        content_type: &'static str,
        content: Vec<u8>,
    },
    /// Forward upstream; holds the path and query sent to the upstream
    Proxy(String),
    NotFound,
    ServerError(io::ErrorKind),
}

/// Rewrite `/` to the default document, leave every other path alone
pub fn normalize_path<'a>(path: &'a str, default_document: &'a str) -> &'a str {
    if path == "/" {
        default_document
    } else {
        path
    }
}

/// Pick the route for an already normalized path
pub async fn decide(path: &str, query: Option<&str>, state: &AppState) -> RouteDecision {
    let root = Path::new(&state.config.static_files.root);

    match static_files::probe(root, path).await {
        FileOutcome::Found {
            path,
            content,
            content_type,
        } => RouteDecision::ServeFile {
            path,
            content_type,
            content,
        },
        FileOutcome::Missing if path.starts_with(state.config.proxy.prefix.as_str()) => {
            let target = match query {
                Some(q) => format!("{path}?{q}"),
                None => path.to_string(),
            };
            RouteDecision::Proxy(target)
        }
        FileOutcome::Missing => RouteDecision::NotFound,
        FileOutcome::Failed(e) => RouteDecision::ServerError(e.kind()),
    }
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
) -> Result<Response<ResponseBody>, Infallible>
where
    B: Body<Data = Bytes> + Send + 'static,
    B::Error: Into<BoxError>,
{
    let decision = {
        let uri = req.uri();
        let path = normalize_path(uri.path(), &state.config.static_files.default_document);
        decide(path, uri.query(), &state).await
    };

    let response = match decision {
        RouteDecision::ServeFile {
            path,
            content_type,
            content,
        } => http::build_file_response(&path, content, content_type),
        RouteDecision::Proxy(target) => proxy::forward(req, &target, &state).await,
        RouteDecision::NotFound => http::build_404_response(),
        RouteDecision::ServerError(kind) => {
            http::build_server_error_response(format!("Server Error: {kind:?}"))
        }
    };
    Ok(response)
}
