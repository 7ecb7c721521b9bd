// upsink library surface, shared by the binary and the integration tests

pub mod config;
pub mod multipart;
pub mod server;
pub mod utils;
