use crate::domain::errors::{ProbeError, ProbeResult};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::collections::BTreeMap;

/// A string-to-string map decoded from a JSON object flag such as
/// `{"name":"age"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringMap(pub BTreeMap<String, String>);

impl StringMap {
    /// Decodes a flag value.
    ///
    /// # Arguments
    /// * `flag` - Flag name, used in the error message
    /// * `raw` - The raw flag text; empty means absent
    ///
    /// # Returns
    /// * `Ok(None)` - The flag was empty
    /// * `Ok(Some(StringMap))` - A JSON object whose values are all strings
    /// * `Err(ProbeError::InvalidJson)` - Anything else
    pub fn parse(flag: &'static str, raw: &str) -> ProbeResult<Option<Self>> {
        if raw.is_empty() {
            return Ok(None);
        }
        serde_json::from_str::<BTreeMap<String, String>>(raw)
            .map(|map| Some(StringMap(map)))
            .map_err(|source| ProbeError::InvalidJson { flag, source })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Encodes the pairs as `application/x-www-form-urlencoded`.
    pub fn to_form_urlencoded(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }
}

/// A JSON request body, sent verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonBody(pub String);

impl JsonBody {
    pub fn new(json: &str) -> Self {
        JsonBody(json.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Query parameters appended to the target URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParams(pub StringMap);

impl QueryParams {
    /// Returns `url` with the encoded parameters appended, after `&` when the
    /// URL already carries a query.
    pub fn apply_to(&self, url: &str) -> String {
        if self.0.is_empty() {
            return url.to_string();
        }
        let encoded = self.0.to_form_urlencoded();
        let (base, fragment) = match url.split_once('#') {
            Some((base, fragment)) => (base, Some(fragment)),
            None => (url, None),
        };
        let separator = match base.find('?') {
            Some(idx) if idx + 1 == base.len() => "",
            Some(_) => "&",
            None => "?",
        };
        match fragment {
            Some(fragment) => format!("{base}{separator}{encoded}#{fragment}"),
            None => format!("{base}{separator}{encoded}"),
        }
    }
}

/// Credentials for HTTP basic authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

impl BasicAuth {
    /// Parses `user:password`; the password may itself contain colons.
    pub fn parse(raw: &str) -> ProbeResult<Option<Self>> {
        if raw.is_empty() {
            return Ok(None);
        }
        let (username, password) = raw.split_once(':').ok_or(ProbeError::InvalidAuth)?;
        Ok(Some(BasicAuth {
            username: username.to_string(),
            password: password.to_string(),
        }))
    }

    pub fn header_value(&self) -> String {
        let token = STANDARD.encode(format!("{}:{}", self.username, self.password));
        format!("Basic {token}")
    }
}
