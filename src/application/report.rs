use crate::domain::entities::{Exchange, TraceInfo};
use crate::domain::errors::ProbeResult;
use serde::Serialize;
use std::collections::BTreeMap;

/// The JSON document printed after a successful exchange.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionReport {
    pub request: String,
    pub response: ResponseSection,
    pub trace: TraceInfo,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResponseSection {
    pub status: String,
    pub header: BTreeMap<String, Vec<String>>,
    pub body: String,
}

impl ExecutionReport {
    pub fn from_exchange(exchange: Exchange) -> Self {
        let Exchange {
            request_dump,
            response,
        } = exchange;
        Self {
            request: request_dump,
            response: ResponseSection {
                status: response.status_line,
                header: response.headers,
                body: response.body,
            },
            trace: response.trace,
        }
    }

    pub fn to_json(&self, pretty: bool) -> ProbeResult<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }
}
