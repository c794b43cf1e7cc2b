pub mod dispatcher;
pub mod pages;
pub mod webhook_server;

pub use dispatcher::Dispatcher;
pub use webhook_server::{WebhookServer, WebhookServerTrait};
