pub mod anilist_auth;
pub mod anilist_graphql;
pub mod handle_sweeper;
pub mod id_mapping;
pub mod media_identifier;
pub mod token_store;
pub mod watch_sync;
pub mod webhook_decoder;
pub mod webhook_processor;

pub use anilist_auth::AniListAuthClient;
pub use anilist_graphql::{AniListGraphQlClient, GraphQlApi};
pub use handle_sweeper::HandleSweeper;
pub use id_mapping::{IdMapping, IdMappingClient};
pub use token_store::{InMemoryTokenStore, TokenStore};
pub use watch_sync::WatchSync;
pub use webhook_processor::{WebhookProcessor, WebhookProcessorTrait};
