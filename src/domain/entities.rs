use crate::domain::errors::ProbeError;
use crate::domain::value_objects::{BasicAuth, JsonBody, QueryParams, StringMap};
use bytes::Bytes;
use http::StatusCode;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// The closed set of verbs the executor can dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl Method {
    /// Title-cases a verb name: `"gET"` becomes `"Get"`.
    pub fn normalize(raw: &str) -> String {
        let lower = raw.trim().to_lowercase();
        let mut chars = lower.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Patch => "PATCH",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
        }
    }
}

impl FromStr for Method {
    type Err = ProbeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Method::normalize(s).as_str() {
            "Get" => Ok(Method::Get),
            "Post" => Ok(Method::Post),
            "Put" => Ok(Method::Put),
            "Delete" => Ok(Method::Delete),
            "Patch" => Ok(Method::Patch),
            "Head" => Ok(Method::Head),
            "Options" => Ok(Method::Options),
            _ => Err(ProbeError::UnsupportedMethod(s.to_string())),
        }
    }
}

/// A local file staged for a multipart upload. The content is read before
/// any network I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub field: String,
    pub path: PathBuf,
    pub file_name: String,
    pub content: Bytes,
}

/// What goes into the request body.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Payload {
    #[default]
    Empty,
    Form(StringMap),
    Json(JsonBody),
    Multipart {
        fields: StringMap,
        files: Vec<UploadFile>,
    },
}

impl Payload {
    /// Content type implied by the payload, if any. Multipart types carry
    /// their boundary and are produced by the encoder instead.
    pub fn content_type(&self) -> Option<&'static str> {
        match self {
            Payload::Empty | Payload::Multipart { .. } => None,
            Payload::Form(_) => Some("application/x-www-form-urlencoded"),
            Payload::Json(_) => Some("application/json"),
        }
    }
}

/// Represents an HTTP request
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>, // Key-value pairs for headers
    pub payload: Payload,
    /// Download destination; only ever set for GET.
    pub output: Option<PathBuf>,
    pub query: Option<QueryParams>,
    pub auth: Option<BasicAuth>,
}

impl Request {
    /// The URL with query parameters applied.
    pub fn target_url(&self) -> String {
        match &self.query {
            Some(query) => query.apply_to(&self.url),
            None => self.url.clone(),
        }
    }

    pub fn has_header(&self, name: &str) -> bool {
        self.headers
            .iter()
            .any(|(key, _)| key.eq_ignore_ascii_case(name))
    }
}

/// Timing breakdown of one exchange.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TraceInfo {
    #[serde(rename = "dns_lookup_ms", serialize_with = "as_millis")]
    pub dns_lookup: Duration,
    #[serde(rename = "tcp_connect_ms", serialize_with = "as_millis")]
    pub tcp_connect: Duration,
    #[serde(rename = "tls_handshake_ms", serialize_with = "as_millis")]
    pub tls_handshake: Duration,
    #[serde(rename = "connect_ms", serialize_with = "as_millis")]
    pub connect: Duration,
    #[serde(rename = "first_response_ms", serialize_with = "as_millis")]
    pub first_response: Duration,
    #[serde(rename = "response_ms", serialize_with = "as_millis")]
    pub response: Duration,
    #[serde(rename = "total_ms", serialize_with = "as_millis")]
    pub total: Duration,
    pub remote_addr: Option<String>,
    pub is_tls: bool,
}

impl TraceInfo {
    /// Cumulative time until the connection was ready to send.
    pub fn pretransfer(&self) -> Duration {
        self.dns_lookup + self.tcp_connect + self.tls_handshake
    }

    /// Cumulative time until the response head arrived.
    pub fn starttransfer(&self) -> Duration {
        self.pretransfer() + self.first_response
    }
}

fn as_millis<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(value.as_nanos() as f64 / 1_000_000.0)
}

/// Represents an HTTP response
#[derive(Debug, Clone)]
pub struct Response {
    pub status: StatusCode,
    pub status_line: String,
    pub headers: BTreeMap<String, Vec<String>>,
    /// Empty when the body was streamed to a download file.
    pub body: String,
    pub trace: TraceInfo,
}

/// What one call produced: the request as written to the wire and the
/// response that came back.
#[derive(Debug, Clone)]
pub struct Exchange {
    pub request_dump: String,
    pub response: Response,
}
