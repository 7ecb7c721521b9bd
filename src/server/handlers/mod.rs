// handler module public api

pub mod buffered;

use axum::http::StatusCode;

pub use buffered::report_upload_length;

/// terminal stage for requests nothing else claimed
pub async fn unmatched() -> StatusCode {
    StatusCode::NOT_FOUND
}
