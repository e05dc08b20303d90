use crate::application::services::ProgressSink;
use crate::domain::entities::UploadFile;
use crate::domain::errors::{ProbeError, ProbeResult};
use crate::domain::value_objects::StringMap;
use bytes::{Bytes, BytesMut};
use futures::future::ready;
use futures::stream::{self, BoxStream};
use futures::{StreamExt, TryStreamExt};
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, StreamBody};
use hyper::body::Frame;
use mpart_async::client::MultipartRequest;
use std::io;
use std::sync::Arc;
use tracing::debug;

const CHUNK_SIZE: usize = 32 * 1024;
const FILE_CONTENT_TYPE: &str = "application/octet-stream";

type PartStream = BoxStream<'static, Result<Bytes, io::Error>>;

/// A `multipart/form-data` upload built with `mpart-async`.
///
/// The form is encoded once up front, which gives the dump bytes and the
/// Content-Length. [`MultipartBody::into_body`] rebuilds it with the same
/// boundary as the stream hyper actually sends, so both are identical.
pub struct MultipartBody {
    boundary: String,
    fields: StringMap,
    files: Vec<UploadFile>,
    encoded: Bytes,
}

impl MultipartBody {
    pub async fn encode(fields: &StringMap, files: &[UploadFile]) -> ProbeResult<Self> {
        let boundary = MultipartRequest::<PartStream>::default()
            .get_boundary()
            .to_string();
        Self::with_boundary(boundary, fields, files).await
    }

    async fn with_boundary(
        boundary: String,
        fields: &StringMap,
        files: &[UploadFile],
    ) -> ProbeResult<Self> {
        let encoded = build_form(&boundary, fields, files, |file| {
            stream::once(ready(Ok::<_, io::Error>(file.content.clone()))).boxed()
        })
        .try_fold(BytesMut::new(), |mut buf, chunk| {
            buf.extend_from_slice(&chunk);
            ready(Ok(buf))
        })
        .await
        .map_err(|e| ProbeError::Transport(format!("Failed to encode multipart body: {e}")))?
        .freeze();

        Ok(Self {
            boundary,
            fields: fields.clone(),
            files: files.to_vec(),
            encoded,
        })
    }

    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    pub fn content_length(&self) -> u64 {
        self.encoded.len() as u64
    }

    /// The whole body in one buffer, for the request dump.
    pub fn to_bytes(&self) -> Bytes {
        self.encoded.clone()
    }

    /// A streaming body that reports each file chunk as hyper pulls it.
    pub fn into_body(self, progress: Arc<dyn ProgressSink>) -> UnsyncBoxBody<Bytes, io::Error> {
        let frames = build_form(&self.boundary, &self.fields, &self.files, |file| {
            tracked_chunks(file, Arc::clone(&progress))
        })
        .try_filter(|chunk| ready(!chunk.is_empty()))
        .map_ok(Frame::data);
        StreamBody::new(frames).boxed_unsync()
    }
}

fn build_form(
    boundary: &str,
    fields: &StringMap,
    files: &[UploadFile],
    mut content: impl FnMut(&UploadFile) -> PartStream,
) -> MultipartRequest<PartStream> {
    let mut form = MultipartRequest::new(boundary);
    for (name, value) in fields.iter() {
        form.add_field(name.as_str(), value.as_str());
    }
    for file in files {
        form.add_stream(
            file.field.as_str(),
            file.file_name.as_str(),
            FILE_CONTENT_TYPE,
            content(file),
        );
    }
    form
}

/// File content in fixed-size chunks, each reporting cumulative progress
/// when polled. An empty file reports once at 0 of 0.
fn tracked_chunks(file: &UploadFile, progress: Arc<dyn ProgressSink>) -> PartStream {
    debug!(field = %file.field, path = %file.path.display(), bytes = file.content.len(), "streaming upload");
    let file_name = file.file_name.clone();
    let content = file.content.clone();
    let total = content.len() as u64;

    if content.is_empty() {
        return stream::once(async move {
            progress.uploaded(&file_name, 0, 0);
            Ok::<_, io::Error>(Bytes::new())
        })
        .boxed();
    }

    let chunks: Vec<(u64, Bytes)> = (0..content.len())
        .step_by(CHUNK_SIZE)
        .map(|offset| {
            let end = usize::min(offset + CHUNK_SIZE, content.len());
            (end as u64, content.slice(offset..end))
        })
        .collect();
    stream::iter(chunks)
        .map(move |(uploaded, chunk)| {
            progress.uploaded(&file_name, uploaded, total);
            Ok(chunk)
        })
        .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::MockProgressSink;
    use mockall::Sequence;
    use mockall::predicate::eq;
    use std::path::PathBuf;

    fn upload(field: &str, file_name: &str, content: &[u8]) -> UploadFile {
        UploadFile {
            field: field.to_string(),
            path: PathBuf::from(file_name),
            file_name: file_name.to_string(),
            content: Bytes::copy_from_slice(content),
        }
    }

    fn fields(raw: &str) -> StringMap {
        StringMap::parse("data", raw).unwrap().unwrap_or_default()
    }

    #[tokio::test]
    async fn form_carries_fields_and_files() {
        let body = MultipartBody::with_boundary(
            "XYZ".to_string(),
            &fields(r#"{"name":"GGBond"}"#),
            &[upload("file", "client.py", b"import os")],
        )
        .await
        .unwrap();

        let text = String::from_utf8_lossy(&body.to_bytes()).into_owned();
        assert!(text.starts_with("--XYZ\r\n"), "{text}");
        assert!(text.contains("name=\"name\"\r\n\r\nGGBond\r\n"), "{text}");
        assert!(text.contains("name=\"file\"; filename=\"client.py\""), "{text}");
        assert!(text.contains("Content-Type: application/octet-stream\r\n\r\nimport os\r\n"), "{text}");
        assert!(text.contains("--XYZ--"), "{text}");
        assert_eq!(body.content_length(), text.len() as u64);
        assert_eq!(body.content_type(), "multipart/form-data; boundary=XYZ");
    }

    #[tokio::test]
    async fn default_boundaries_are_unique() {
        let empty = StringMap::default();
        let first = MultipartBody::encode(&empty, &[]).await.unwrap();
        let second = MultipartBody::encode(&empty, &[]).await.unwrap();
        assert_ne!(first.content_type(), second.content_type());
    }

    #[tokio::test]
    async fn streaming_reports_each_chunk() {
        let content = vec![7u8; CHUNK_SIZE + 10];
        let body = MultipartBody::with_boundary(
            "B".to_string(),
            &StringMap::default(),
            &[upload("f", "big.bin", &content)],
        )
        .await
        .unwrap();
        let expected = body.to_bytes();

        let mut progress = MockProgressSink::new();
        let mut seq = Sequence::new();
        let total = content.len() as u64;
        progress
            .expect_uploaded()
            .with(eq("big.bin"), eq(CHUNK_SIZE as u64), eq(total))
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        progress
            .expect_uploaded()
            .with(eq("big.bin"), eq(total), eq(total))
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());

        let collected = body
            .into_body(Arc::new(progress))
            .collect()
            .await
            .unwrap()
            .to_bytes();
        assert_eq!(collected, expected);
    }

    #[tokio::test]
    async fn empty_file_still_reports() {
        let body = MultipartBody::with_boundary(
            "B".to_string(),
            &StringMap::default(),
            &[upload("f", "empty.txt", b"")],
        )
        .await
        .unwrap();
        let expected = body.to_bytes();

        let mut progress = MockProgressSink::new();
        progress
            .expect_uploaded()
            .with(eq("empty.txt"), eq(0), eq(0))
            .times(1)
            .return_const(());

        let collected = body
            .into_body(Arc::new(progress))
            .collect()
            .await
            .unwrap()
            .to_bytes();
        assert_eq!(collected, expected);
        assert!(String::from_utf8_lossy(&collected).contains("--B--"));
    }
}
