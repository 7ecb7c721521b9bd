// buffered single-file upload endpoint

use axum::{extract::Multipart, http::StatusCode, Json};
use tracing::{error, info, warn};

/// accept one form-bound file and report its byte length
///
/// this path buffers the file through axum's own multipart binding rather
/// than the streaming pipeline; nothing is written to disk
pub async fn report_upload_length(mut multipart: Multipart) -> Result<Json<u64>, StatusCode> {
    while let Some(field) = multipart.next_field().await.map_err(|err| {
        error!("failed to read multipart field: {}", err);
        err.status()
    })? {
        if field.name() != Some("file") {
            continue;
        }

        let bytes = field.bytes().await.map_err(|err| {
            error!("failed to buffer file field: {}", err);
            err.status()
        })?;

        info!("buffered upload of {} bytes", bytes.len());
        return Ok(Json(bytes.len() as u64));
    }

    warn!("no file field in buffered upload request");
    Err(StatusCode::BAD_REQUEST)
}
