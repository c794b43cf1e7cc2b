pub mod anilist;
pub mod plex;
pub mod request;

pub use anilist::*;
pub use plex::*;
pub use request::*;
