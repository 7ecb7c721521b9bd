// streaming append of multipart sections to files on disk

use std::io::{self, ErrorKind};
use std::path::PathBuf;

use axum::http::StatusCode;
use futures::TryStreamExt;
use thiserror::Error;
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_util::io::StreamReader;

use crate::config::AppConfig;

/// fixed chunk size of the read/write loop
pub const CHUNK_SIZE: usize = 1024;

const MAX_FILENAME_BYTES: usize = 255;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("invalid filename")]
    InvalidFilename,
    #[error("upload directory missing")]
    MissingDirectory,
    #[error("upload base is not a directory")]
    InvalidBase,
    #[error("section too large")]
    SectionTooLarge,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("multipart error: {0}")]
    Multipart(#[from] multer::Error),
}

impl UploadError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            UploadError::InvalidFilename => StatusCode::BAD_REQUEST,
            UploadError::MissingDirectory => StatusCode::NOT_FOUND,
            UploadError::InvalidBase => StatusCode::INTERNAL_SERVER_ERROR,
            UploadError::SectionTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            UploadError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            UploadError::Multipart(_) => StatusCode::BAD_REQUEST,
        }
    }
}

/// append one section's body to a file named by the section
///
/// the file is opened in append mode (a re-upload of the same name
/// concatenates, it does not replace) and its handle is released when this
/// function returns, on every exit path; a failed section leaves whatever
/// it appended in place
pub async fn append_section(
    config: &AppConfig,
    raw_filename: &str,
    field: multer::Field<'_>,
) -> Result<PathBuf, UploadError> {
    ensure_upload_base_dir(config).await?;
    let filename = sanitize_filename(raw_filename)?;
    let target_path = config.server.upload_dir.join(&filename);

    let mut file = fs::OpenOptions::new()
        .append(true)
        .create(true)
        .open(&target_path)
        .await?;

    copy_section_to_file(field, &mut file, config.upload.max_section_size).await?;

    Ok(target_path)
}

/// make sure the upload base exists before opening files under it
async fn ensure_upload_base_dir(config: &AppConfig) -> Result<(), UploadError> {
    let upload_base = &config.server.upload_dir;

    match fs::metadata(upload_base).await {
        Ok(metadata) => {
            if !metadata.is_dir() {
                return Err(UploadError::InvalidBase);
            }
            Ok(())
        }
        Err(err) if err.kind() == ErrorKind::NotFound => {
            if config.upload.create_directories {
                fs::create_dir_all(upload_base).await?;
                Ok(())
            } else {
                Err(UploadError::MissingDirectory)
            }
        }
        Err(err) => Err(UploadError::Io(err)),
    }
}

/// reject client-supplied names that would escape the upload directory
fn sanitize_filename(filename: &str) -> Result<String, UploadError> {
    if filename.is_empty() {
        return Err(UploadError::InvalidFilename);
    }

    if filename.len() > MAX_FILENAME_BYTES {
        return Err(UploadError::InvalidFilename);
    }

    if filename.contains('/') || filename.contains('\\') {
        return Err(UploadError::InvalidFilename);
    }

    if filename == "." || filename == ".." {
        return Err(UploadError::InvalidFilename);
    }

    if filename.contains('\0') {
        return Err(UploadError::InvalidFilename);
    }

    Ok(filename.to_string())
}

/// drain the section stream into the file in fixed-size chunks
///
/// reads into a reusable buffer and writes exactly the bytes read, until a
/// read returns zero bytes
async fn copy_section_to_file(
    field: multer::Field<'_>,
    file: &mut fs::File,
    max_bytes: u64,
) -> Result<u64, UploadError> {
    let mut reader =
        StreamReader::new(field.map_err(|err| io::Error::new(ErrorKind::Other, err)));

    let mut buffer = [0u8; CHUNK_SIZE];
    let mut written: u64 = 0;

    loop {
        let read = match reader.read(&mut buffer).await {
            Ok(read) => read,
            Err(err) => return Err(classify_read_error(err)),
        };
        if read == 0 {
            break;
        }

        written += read as u64;
        if written > max_bytes {
            return Err(UploadError::SectionTooLarge);
        }

        file.write_all(&buffer[..read]).await?;
    }

    file.flush().await?;
    Ok(written)
}

/// recover the multipart error the stream adapter wrapped, so framing and
/// stream faults stay a client error rather than an io failure
fn classify_read_error(err: io::Error) -> UploadError {
    match err.downcast::<multer::Error>() {
        Ok(multipart) => UploadError::Multipart(multipart),
        Err(err) => UploadError::Io(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_accepts_plain_names() {
        assert_eq!(sanitize_filename("report.pdf").unwrap(), "report.pdf");
        assert_eq!(sanitize_filename("a.bin").unwrap(), "a.bin");
        assert_eq!(sanitize_filename(".hidden").unwrap(), ".hidden");
    }

    #[test]
    fn sanitize_rejects_path_separators() {
        assert!(sanitize_filename("../evil.txt").is_err());
        assert!(sanitize_filename("/etc/passwd").is_err());
        assert!(sanitize_filename("dir\\evil.txt").is_err());
    }

    #[test]
    fn sanitize_rejects_empty_and_dot_names() {
        assert!(sanitize_filename("").is_err());
        assert!(sanitize_filename(".").is_err());
        assert!(sanitize_filename("..").is_err());
    }

    #[test]
    fn sanitize_rejects_oversized_names() {
        let long = "x".repeat(MAX_FILENAME_BYTES + 1);
        assert!(sanitize_filename(&long).is_err());
    }

    #[test]
    fn sanitize_rejects_nul_bytes() {
        assert!(sanitize_filename("a\0b").is_err());
    }

    #[test]
    fn read_errors_recover_the_wrapped_multipart_fault() {
        let wrapped = io::Error::new(ErrorKind::Other, multer::Error::IncompleteStream);
        match classify_read_error(wrapped) {
            UploadError::Multipart(_) => {}
            other => panic!("expected a multipart error, got {other:?}"),
        }

        let plain = io::Error::new(ErrorKind::PermissionDenied, "denied");
        match classify_read_error(plain) {
            UploadError::Io(_) => {}
            other => panic!("expected an io error, got {other:?}"),
        }
    }
}
