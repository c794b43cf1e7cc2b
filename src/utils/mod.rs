pub mod error;
pub mod json;
pub mod request_id;
pub mod webhook_url;

pub use error::*;
pub use json::*;
pub use webhook_url::*;
