//! Logger module
//!
//! Provides logging utilities for the server including:
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Error and warning logging
//! - File-based logging support

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::Config;
use std::net::SocketAddr;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

/// Write to info/access log
fn write_info(message: &str) {
    match writer::get() {
        Some(w) => w.write_info(message),
        None => println!("{message}"),
    }
}

/// Write to error log
fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

/// Write to access log specifically
fn write_access(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => println!("{message}"),
    }
}

/// Startup banner: where the server listens, what it serves, where to start
pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    for line in banner_lines(addr, config) {
        write_info(&line);
    }
}

fn banner_lines(addr: &SocketAddr, config: &Config) -> [String; 3] {
    let port = addr.port();
    [
        format!("Server running at http://localhost:{port}/"),
        format!(
            "This server hosts the static files in '{}' and proxies {} requests to http://{}",
            config.static_files.root,
            config.proxy.prefix,
            config.proxy.authority()
        ),
        format!(
            "Open http://localhost:{port}{} to get started",
            config.static_files.default_document
        ),
    ]
}

/// Optional settings worth echoing after the banner
pub fn log_server_details(config: &Config) {
    if let Some(workers) = config.server.workers {
        write_info(&format!("Worker threads: {workers}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        write_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("Error log: {path}"));
    }
}

pub fn log_server_stop(active_connections: usize) {
    write_info(&format!(
        "Shutdown requested, no longer accepting connections ({active_connections} still active)"
    ));
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    write_info(&format!("[Connection] Accepted from: {peer_addr}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_access(&entry.format(format));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_has_three_lines() {
        let mut config = Config::load_from("/nonexistent/assetgate-config").unwrap();
        config.server.workers = Some(2);
        config.logging.access_log_file = Some("/tmp/access.log".to_string());
        let addr: SocketAddr = "127.0.0.1:8080".parse().unwrap();

        let lines = banner_lines(&addr, &config);
        assert_eq!(lines[0], "Server running at http://localhost:8080/");
        assert!(lines[1].contains("proxies /api/ requests to http://localhost:8000"));
        assert_eq!(lines[2], "Open http://localhost:8080/play-doom.html to get started");
        assert!(lines.iter().all(|l| !l.contains("Worker threads")));
    }
}
