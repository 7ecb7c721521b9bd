// streaming upload pipeline, shaped as pass-through middleware

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use tracing::{debug, error, info, warn};

use crate::multipart::{extract_boundary, extract_filename, is_multipart_content_type};
use crate::server::app::AppState;
use crate::server::uploads;

/// stream a multipart request body to disk, section by section
///
/// non-multipart requests pass through to the next stage untouched; for
/// multipart requests the boundary is taken from the content-type, the body
/// is walked section by section, and each section is appended to a file
/// named by its content-disposition
pub async fn stream_uploads_if_multipart(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    // sampled at entry, before the gate, for every request
    if let Some(mib) = state.working_set.resident_set_mib() {
        info!("working set at entry: {} MiB", mib);
    }

    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    if !is_multipart_content_type(content_type.as_deref()) {
        debug!("not a multipart request, passing through");
        return Ok(next.run(request).await);
    }

    // the gate only fires when a content-type is present
    let content_type = content_type.unwrap_or_default();
    let boundary = extract_boundary(&content_type).map_err(|err| {
        warn!("rejecting upload: {}", err);
        StatusCode::BAD_REQUEST
    })?;

    let body_stream = request.into_body().into_data_stream();
    let mut sections = multer::Multipart::new(body_stream, boundary);

    let mut section_count = 0usize;
    while let Some(field) = sections.next_field().await.map_err(|err| {
        error!("failed to advance to next section: {}", err);
        StatusCode::BAD_REQUEST
    })? {
        let disposition = field
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("");

        let filename = extract_filename(disposition).map_err(|err| {
            warn!("rejecting section: {}", err);
            StatusCode::BAD_REQUEST
        })?;

        let target_path = uploads::append_section(&state.config, &filename, field)
            .await
            .map_err(|err| {
                error!("upload failed: {}", err);
                err.status_code()
            })?;

        section_count += 1;
        info!("section written: {}", target_path.display());
    }

    if let Some(mib) = state.working_set.resident_set_mib() {
        info!("working set after upload: {} MiB", mib);
    }

    info!("upload complete: {} section(s)", section_count);

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(Body::from("Upload successfully!"))
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}
