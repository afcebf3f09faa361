pub mod client;
pub mod request;

pub use client::ApiClient;
pub use request::{FilePart, RequestBody, RequestOptions};
