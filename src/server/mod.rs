// server module public api

pub mod app;
pub mod handlers;
pub mod middleware;
pub mod uploads;

pub use app::{create_app, create_test_app, start_server};
