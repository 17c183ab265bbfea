//! Upstream proxy module
//!
//! Forwards a request to the upstream service and streams its response back.
//! Request and response bodies are relayed frame by frame, never buffered
//! whole.

use crate::config::AppState;
use crate::http::{self, BoxError, ResponseBody, UpstreamBody};
use crate::logger;
use http_body_util::BodyExt;
use hyper::body::{Body, Bytes, Incoming};
use hyper::{Request, Response, Uri};
use std::time::Duration;
use thiserror::Error;

/// Failures of an upstream exchange before its status and headers arrive
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("invalid upstream target")]
    InvalidTarget(#[from] hyper::http::Error),
    #[error("upstream request failed")]
    Upstream(#[from] hyper_util::client::legacy::Error),
    #[error("upstream did not respond within {0:?}")]
    Timeout(Duration),
}

/// Render an error followed by its chain of sources
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Forward `req` to the upstream as `target` (path and query)
///
/// Any failure before the upstream answers becomes a 500 response; the
/// inbound response is never started before that point.
pub async fn forward<B>(
    req: Request<B>,
    target: &str,
    state: &AppState,
) -> Response<ResponseBody>
where
    B: Body<Data = Bytes> + Send + 'static,
    B::Error: Into<BoxError>,
{
    match exchange(req, target, state).await {
        Ok(resp) => resp.map(BodyExt::boxed_unsync),
        Err(e) => {
            let message = error_chain(&e);
            logger::log_error(&format!(
                "Proxy to {}{target} failed: {message}",
                state.upstream.authority
            ));
            http::build_server_error_response(format!("Error proxying to API: {message}"))
        }
    }
}

async fn exchange<B>(
    req: Request<B>,
    target: &str,
    state: &AppState,
) -> Result<Response<Incoming>, ProxyError>
where
    B: Body<Data = Bytes> + Send + 'static,
    B::Error: Into<BoxError>,
{
    let outbound = build_upstream_request(req, &state.upstream.authority, target)?;
    let pending = state.client.request(outbound);

    let resp = match state.upstream.timeout {
        Some(limit) => tokio::time::timeout(limit, pending)
            .await
            .map_err(|_| ProxyError::Timeout(limit))??,
        None => pending.await?,
    };
    Ok(resp)
}

/// Rebuild an inbound request for the upstream
///
/// Method, headers and body are carried over verbatim; only the URI is
/// rewritten to point at `authority`.
pub fn build_upstream_request<B>(
    req: Request<B>,
    authority: &str,
    target: &str,
) -> Result<Request<UpstreamBody>, ProxyError>
where
    B: Body<Data = Bytes> + Send + 'static,
    B::Error: Into<BoxError>,
{
    let uri = Uri::builder()
        .scheme("http")
        .authority(authority)
        .path_and_query(target)
        .build()?;

    let (parts, body) = req.into_parts();
    let body: UpstreamBody = body.map_err(Into::into).boxed_unsync();
    let mut outbound = Request::new(body);
    *outbound.method_mut() = parts.method;
    *outbound.uri_mut() = uri;
    *outbound.headers_mut() = parts.headers;
    Ok(outbound)
}
