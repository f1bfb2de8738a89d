// HTTP edge: feed loading, crawler metadata, CMS login and page routes

pub mod bots;
pub mod error;
pub mod loader;
pub mod oauth;
pub mod responder;
pub mod routes;
pub mod state;

pub use error::{EdgeError, Result};
pub use loader::{AssetDirSource, ContentLoader, ContentSource, HttpSource};
pub use oauth::OAuthCredentials;
pub use routes::build_router;
pub use state::AppState;
