use crate::application::report::ExecutionReport;
use crate::domain::entities::{Exchange, Request};
use crate::domain::errors::ProbeResult;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

/// Trait for HTTP clients to enable mocking and dependency inversion
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn send(&self, request: Request, progress: Arc<dyn ProgressSink>) -> ProbeResult<Exchange>;
}

/// Receives transfer progress as the transport moves each chunk.
#[cfg_attr(test, mockall::automock)]
pub trait ProgressSink: Send + Sync {
    fn uploaded(&self, file_name: &str, uploaded: u64, total: u64);
    fn downloaded(&self, downloaded: u64, total: Option<u64>);
}

/// Application service for orchestrating one request/report cycle
pub struct HttpRequestService {
    http_client: Box<dyn HttpClient>,
    progress: Arc<dyn ProgressSink>,
}

impl HttpRequestService {
    pub fn new(http_client: Box<dyn HttpClient>, progress: Arc<dyn ProgressSink>) -> Self {
        Self {
            http_client,
            progress,
        }
    }

    /// Sends the request and assembles the report. Nothing is retried.
    pub async fn execute(&self, request: Request) -> ProbeResult<ExecutionReport> {
        debug!(
            method = request.method.as_str(),
            url = %request.target_url(),
            download = request.output.is_some(),
            "dispatching request"
        );
        let exchange = self
            .http_client
            .send(request, Arc::clone(&self.progress))
            .await?;
        info!(
            status = exchange.response.status.as_u16(),
            total_ms = exchange.response.trace.total.as_millis() as u64,
            "request completed"
        );
        Ok(ExecutionReport::from_exchange(exchange))
    }
}
