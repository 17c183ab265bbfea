// Application state module
// Immutable per-process state shared by every request handler

use std::time::Duration;

use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;

use super::types::Config;
use crate::http::UpstreamBody;

/// Fixed upstream service requests under the proxy prefix are forwarded to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamTarget {
    /// `host:port`
    pub authority: String,
    pub timeout: Option<Duration>,
}

/// Application state
pub struct AppState {
    pub config: Config,
    pub upstream: UpstreamTarget,
    pub client: Client<HttpConnector, UpstreamBody>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        let upstream = UpstreamTarget {
            authority: config.proxy.authority(),
            timeout: config.proxy.timeout(),
        };

        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        Self {
            config: config.clone(),
            upstream,
            client,
        }
    }
}
