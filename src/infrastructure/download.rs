use crate::application::services::ProgressSink;
use crate::domain::errors::{ProbeError, ProbeResult};
use bytes::Bytes;
use http_body_util::BodyExt;
use hyper::body::Body;
use std::fmt::Display;
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Streams a response body into `path`, reporting progress after every data
/// frame. Returns the number of bytes written. A failed transfer leaves the
/// partial file in place.
pub async fn save_body<B>(
    mut body: B,
    path: &Path,
    content_length: Option<u64>,
    progress: &dyn ProgressSink,
) -> ProbeResult<u64>
where
    B: Body<Data = Bytes> + Unpin,
    B::Error: Display,
{
    let io_error = |source: std::io::Error| ProbeError::Download {
        path: path.display().to_string(),
        source,
    };

    let mut file = File::create(path).await.map_err(io_error)?;
    let mut downloaded = 0u64;

    while let Some(frame) = body.frame().await {
        let frame = frame.map_err(|e| ProbeError::Transport(e.to_string()))?;
        let Ok(chunk) = frame.into_data() else {
            continue;
        };
        file.write_all(&chunk).await.map_err(io_error)?;
        downloaded += chunk.len() as u64;
        progress.downloaded(downloaded, content_length);
    }

    file.flush().await.map_err(io_error)?;
    debug!(path = %path.display(), bytes = downloaded, "download finished");
    Ok(downloaded)
}
