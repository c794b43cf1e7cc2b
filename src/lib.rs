pub mod config;
pub mod handlers;
pub mod models;
pub mod providers;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use config::AppConfig;
pub use handlers::Dispatcher;
pub use models::*;
pub use utils::{AppError, Result};
