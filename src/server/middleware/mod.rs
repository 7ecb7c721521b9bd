// middleware module public api

pub mod stream_uploads;

pub use stream_uploads::stream_uploads_if_multipart;
