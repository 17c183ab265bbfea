//! Access log format module
//!
//! Supports multiple log formats:
//! - `combined` (Apache/Nginx combined format)
//! - `common` (Common Log Format - CLF)
//! - `json` (one JSON object per line)
//! - Custom patterns with variables

use chrono::{DateTime, Local};
use hyper::{HeaderMap, Version};

/// Access log entry containing all request/response information
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    pub remote_addr: String,
    pub time: DateTime<Local>,
    pub method: String,
    pub path: String,
    /// Query string (without leading ?)
    pub query: Option<String>,
    /// HTTP version (1.0, 1.1, 2)
    pub http_version: String,
    pub status: u16,
    /// Response body size, `None` for streamed bodies of unknown length
    pub body_bytes: Option<u64>,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
    /// Time until the response head was ready, in microseconds
    pub request_time_us: u64,
}

impl AccessLogEntry {
    /// Create a new access log entry with current timestamp
    pub fn new(remote_addr: String, method: String, path: String) -> Self {
        Self {
            remote_addr,
            time: Local::now(),
            method,
            path,
            query: None,
            http_version: "1.1".to_string(),
            status: 200,
            body_bytes: None,
            referer: None,
            user_agent: None,
            request_time_us: 0,
        }
    }

    /// Fill version, referer and user agent from the inbound request
    pub fn with_request_details(mut self, version: Version, headers: &HeaderMap) -> Self {
        self.http_version = match version {
            Version::HTTP_09 => "0.9",
            Version::HTTP_10 => "1.0",
            Version::HTTP_2 => "2",
            Version::HTTP_3 => "3",
            _ => "1.1",
        }
        .to_string();
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(ToString::to_string)
        };
        self.referer = header("referer");
        self.user_agent = header("user-agent");
        self
    }

    /// Format the log entry according to the specified format
    pub fn format(&self, format: &str) -> String {
        match format {
            "combined" => self.format_combined(),
            "common" => self.format_common(),
            "json" => self.format_json(),
            custom => self.format_custom(custom),
        }
    }

    fn request_uri(&self) -> String {
        match &self.query {
            Some(q) => format!("{}?{q}", self.path),
            None => self.path.clone(),
        }
    }

    fn body_bytes_field(&self) -> String {
        self.body_bytes
            .map_or_else(|| "-".to_string(), |b| b.to_string())
    }

    /// `$remote_addr - - [$time_local] "$request" $status $body_bytes_sent "$http_referer" "$http_user_agent"`
    fn format_combined(&self) -> String {
        format!(
            "{} \"{}\" \"{}\"",
            self.format_common(),
            self.referer.as_deref().unwrap_or("-"),
            self.user_agent.as_deref().unwrap_or("-"),
        )
    }

    /// `$remote_addr - - [$time_local] "$request" $status $body_bytes_sent`
    fn format_common(&self) -> String {
        format!(
            "{} - - [{}] \"{} {} HTTP/{}\" {} {}",
            self.remote_addr,
            self.time.format("%d/%b/%Y:%H:%M:%S %z"),
            self.method,
            self.request_uri(),
            self.http_version,
            self.status,
            self.body_bytes_field(),
        )
    }

    fn format_json(&self) -> String {
        serde_json::json!({
            "remote_addr": self.remote_addr,
            "time": self.time.to_rfc3339(),
            "method": self.method,
            "path": self.path,
            "query": self.query,
            "http_version": self.http_version,
            "status": self.status,
            "body_bytes": self.body_bytes,
            "referer": self.referer,
            "user_agent": self.user_agent,
            "request_time_us": self.request_time_us,
        })
        .to_string()
    }

    /// Custom format with variable substitution
    ///
    /// Supported variables: `$remote_addr`, `$time_local`, `$time_iso8601`,
    /// `$request`, `$request_method`, `$request_uri`, `$request_time`
    /// (seconds, 3 decimals), `$status`, `$body_bytes_sent`,
    /// `$http_referer`, `$http_user_agent`.
    ///
    /// The pattern is scanned once, so substituted values are never
    /// expanded again.
    fn format_custom(&self, pattern: &str) -> String {
        let mut out = String::with_capacity(pattern.len());
        let mut rest = pattern;

        while let Some(pos) = rest.find('$') {
            out.push_str(&rest[..pos]);
            let tail = &rest[pos..];
            match CUSTOM_VARIABLES.iter().find(|name| tail.starts_with(**name)) {
                Some(name) => {
                    out.push_str(&self.variable(name));
                    rest = &tail[name.len()..];
                }
                None => {
                    out.push('$');
                    rest = &tail[1..];
                }
            }
        }
        out.push_str(rest);
        out
    }

    fn variable(&self, name: &str) -> String {
        match name {
            "$remote_addr" => self.remote_addr.clone(),
            "$time_local" => self.time.format("%d/%b/%Y:%H:%M:%S %z").to_string(),
            "$time_iso8601" => self.time.to_rfc3339(),
            "$request_method" => self.method.clone(),
            "$request_time" => {
                #[allow(clippy::cast_precision_loss)]
                let seconds = self.request_time_us as f64 / 1_000_000.0;
                format!("{seconds:.3}")
            }
            "$request_uri" => self.request_uri(),
            "$request" => format!(
                "{} {} HTTP/{}",
                self.method,
                self.request_uri(),
                self.http_version
            ),
            "$status" => self.status.to_string(),
            "$body_bytes_sent" => self.body_bytes_field(),
            "$http_referer" => self.referer.as_deref().unwrap_or("-").to_string(),
            "$http_user_agent" => self.user_agent.as_deref().unwrap_or("-").to_string(),
            _ => String::new(),
        }
    }
}

/// Variables recognised in custom formats; longer names sharing a prefix
/// come first
const CUSTOM_VARIABLES: &[&str] = &[
    "$remote_addr",
    "$time_local",
    "$time_iso8601",
    "$request_method",
    "$request_time",
    "$request_uri",
    "$request",
    "$status",
    "$body_bytes_sent",
    "$http_referer",
    "$http_user_agent",
];

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_entry() -> AccessLogEntry {
        let mut entry = AccessLogEntry::new(
            "192.168.1.1".to_string(),
            "POST".to_string(),
            "/api/input".to_string(),
        );
        entry.query = Some("key=fire".to_string());
        entry.status = 201;
        entry.body_bytes = Some(1234);
        entry.referer = Some("http://localhost:8080/play-doom.html".to_string());
        entry.user_agent = Some("Mozilla/5.0".to_string());
        entry.request_time_us = 1750;
        entry
    }

    #[test]
    fn test_format_combined() {
        let log = create_test_entry().format("combined");
        assert!(log.starts_with("192.168.1.1 - - ["));
        assert!(log.contains("\"POST /api/input?key=fire HTTP/1.1\" 201 1234"));
        assert!(log.contains("\"http://localhost:8080/play-doom.html\""));
        assert!(log.ends_with("\"Mozilla/5.0\""));
    }

    #[test]
    fn test_format_common() {
        let log = create_test_entry().format("common");
        assert!(log.contains("\"POST /api/input?key=fire HTTP/1.1\" 201 1234"));
        // Common format does not include referer/user-agent
        assert!(!log.contains("Mozilla/5.0"));
    }

    #[test]
    fn test_unknown_body_size() {
        let mut entry = create_test_entry();
        entry.body_bytes = None;
        assert!(entry.format("common").ends_with("201 -"));
        let json: serde_json::Value = serde_json::from_str(&entry.format("json")).unwrap();
        assert!(json["body_bytes"].is_null());
    }

    #[test]
    fn test_format_json() {
        let log = create_test_entry().format("json");
        let json: serde_json::Value = serde_json::from_str(&log).unwrap();
        assert_eq!(json["remote_addr"], "192.168.1.1");
        assert_eq!(json["method"], "POST");
        assert_eq!(json["path"], "/api/input");
        assert_eq!(json["query"], "key=fire");
        assert_eq!(json["status"], 201);
        assert_eq!(json["body_bytes"], 1234);
        assert_eq!(json["request_time_us"], 1750);
        assert!(!log.contains('\n'));
    }

    #[test]
    fn test_format_json_escapes_control_characters() {
        let mut entry = create_test_entry();
        entry.user_agent = Some("evil\u{1b}[31m\"agent\"\n".to_string());
        entry.query = None;

        let json: serde_json::Value = serde_json::from_str(&entry.format("json")).unwrap();
        assert_eq!(json["user_agent"], "evil\u{1b}[31m\"agent\"\n");
        assert!(json["query"].is_null());
    }

    #[test]
    fn test_format_custom() {
        let log = create_test_entry()
            .format("$request_method $request_uri -> $status in $request_time");
        assert_eq!(log, "POST /api/input?key=fire -> 201 in 0.002");
    }

    #[test]
    fn test_format_custom_does_not_expand_values() {
        let mut entry = create_test_entry();
        entry.path = "/api/$status".to_string();
        entry.query = None;
        entry.user_agent = Some("$remote_addr".to_string());

        let log = entry.format("$request_uri $status $http_user_agent $request $unknown $");
        assert_eq!(
            log,
            "/api/$status 201 $remote_addr POST /api/$status HTTP/1.1 $unknown $"
        );
    }

    #[test]
    fn test_request_details() {
        let mut headers = HeaderMap::new();
        headers.insert("user-agent", "curl/8.0".parse().unwrap());
        let entry = AccessLogEntry::new("::1".into(), "GET".into(), "/".into())
            .with_request_details(Version::HTTP_10, &headers);
        assert_eq!(entry.http_version, "1.0");
        assert_eq!(entry.user_agent.as_deref(), Some("curl/8.0"));
        assert_eq!(entry.referer, None);
    }
}
