use crate::domain::entities::{Method, Payload, Request, UploadFile};
use crate::domain::errors::{ProbeError, ProbeResult};
use crate::domain::value_objects::{BasicAuth, JsonBody, QueryParams, StringMap};
use bytes::Bytes;
use http::header::{HeaderName, HeaderValue};
use std::path::PathBuf;
use std::str::FromStr;

/// Turns raw flag strings into an immutable [`Request`]. Empty strings mean
/// "absent" for every optional flag.
pub struct RequestBuilder {
    method: Method,
    url: String,
    headers: Vec<(String, String)>,
    form: Option<StringMap>,
    json: Option<JsonBody>,
    files: Vec<UploadFile>,
    output: Option<PathBuf>,
    query: Option<QueryParams>,
    auth: Option<BasicAuth>,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self {
            method: Method::Get,
            url: String::new(),
            headers: Vec::new(),
            form: None,
            json: None,
            files: Vec::new(),
            output: None,
            query: None,
            auth: None,
        }
    }

    pub fn method(mut self, method: &str) -> ProbeResult<Self> {
        self.method = Method::from_str(method)?;
        Ok(self)
    }

    /// The URL is kept as given; malformed URLs fail in the transport.
    pub fn url(mut self, raw_url: &str) -> Self {
        self.url = raw_url.to_string();
        self
    }

    /// Names and values must be sendable as-is; a bad one is an input error.
    pub fn headers(mut self, raw_headers: &str) -> ProbeResult<Self> {
        let Some(map) = StringMap::parse("header", raw_headers)? else {
            return Ok(self);
        };
        for (name, value) in &map.0 {
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| ProbeError::InvalidHeader {
                name: name.clone(),
                reason: e.to_string(),
            })?;
            HeaderValue::from_str(value).map_err(|e| ProbeError::InvalidHeader {
                name: name.clone(),
                reason: e.to_string(),
            })?;
        }
        self.headers = map.0.into_iter().collect();
        Ok(self)
    }

    pub fn output(mut self, path: &str) -> Self {
        if !path.is_empty() {
            self.output = Some(PathBuf::from(path));
        }
        self
    }

    /// Stages every file of a `{"field": "path"}` map, reading it from disk.
    pub fn files(mut self, raw_files: &str) -> ProbeResult<Self> {
        let Some(map) = StringMap::parse("file", raw_files)? else {
            return Ok(self);
        };
        for (field, path) in map.0 {
            let content = std::fs::read(&path).map_err(|source| ProbeError::ReadUpload {
                path: path.clone(),
                source,
            })?;
            let path = PathBuf::from(path);
            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| field.clone());
            self.files.push(UploadFile {
                field,
                path,
                file_name,
                content: Bytes::from(content),
            });
        }
        Ok(self)
    }

    /// Form data and JSON are mutually exclusive: a non-empty `json` wins and
    /// `data` is then neither parsed nor sent.
    pub fn body(mut self, data: &str, json: &str) -> ProbeResult<Self> {
        if !json.is_empty() {
            self.json = Some(JsonBody::new(json));
        } else {
            self.form = StringMap::parse("data", data)?;
        }
        Ok(self)
    }

    pub fn params(mut self, raw_params: &str) -> ProbeResult<Self> {
        self.query = StringMap::parse("params", raw_params)?.map(QueryParams);
        Ok(self)
    }

    pub fn auth(mut self, raw_auth: &str) -> ProbeResult<Self> {
        self.auth = BasicAuth::parse(raw_auth)?;
        Ok(self)
    }

    pub fn build(self) -> Request {
        let payload = if !self.files.is_empty() {
            Payload::Multipart {
                fields: self.form.unwrap_or_default(),
                files: self.files,
            }
        } else if let Some(json) = self.json {
            Payload::Json(json)
        } else if let Some(form) = self.form {
            Payload::Form(form)
        } else {
            Payload::Empty
        };

        let output = match self.method {
            Method::Get => self.output,
            _ => None,
        };

        Request {
            method: self.method,
            url: self.url,
            headers: self.headers,
            payload,
            output,
            query: self.query,
            auth: self.auth,
        }
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}
