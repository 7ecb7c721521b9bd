// multipart header parsing: the gate, the boundary token, and
// content-disposition filenames

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HeaderParseError {
    #[error("content-type has no boundary parameter")]
    MissingBoundary,

    #[error("content-disposition has no filename part")]
    MissingFilename,

    #[error("content-disposition has more than one filename part")]
    AmbiguousFilename,
}

/// decide whether a request body should be routed through the streaming
/// upload pipeline
///
/// true iff the content-type is present, non-empty, and mentions
/// `multipart/` (case-insensitive)
pub fn is_multipart_content_type(content_type: Option<&str>) -> bool {
    match content_type {
        Some(value) => !value.is_empty() && value.to_ascii_lowercase().contains("multipart/"),
        None => false,
    }
}

/// extract the boundary token that delimits sections of a multipart body
///
/// the header value is split on spaces and the first token starting with
/// `boundary=` wins; a single pair of surrounding double quotes is removed
pub fn extract_boundary(content_type: &str) -> Result<String, HeaderParseError> {
    let token = content_type
        .split(' ')
        .find(|token| token.starts_with("boundary="))
        .ok_or(HeaderParseError::MissingBoundary)?;

    let mut boundary = &token["boundary=".len()..];
    if boundary.len() >= 2 && boundary.starts_with('"') && boundary.ends_with('"') {
        boundary = &boundary[1..boundary.len() - 1];
    }

    Ok(boundary.to_string())
}

/// extract the filename carried in a section's content-disposition value
///
/// exactly one `;`-separated part may mention `filename`; the name is that
/// part's last `=`-separated segment with surrounding quotes stripped
pub fn extract_filename(content_disposition: &str) -> Result<String, HeaderParseError> {
    let mut candidates = content_disposition
        .split(';')
        .filter(|part| part.contains("filename"));

    let part = candidates.next().ok_or(HeaderParseError::MissingFilename)?;
    if candidates.next().is_some() {
        return Err(HeaderParseError::AmbiguousFilename);
    }

    let segment = part.split('=').last().unwrap_or("");
    Ok(segment.trim_matches('"').to_string())
}
