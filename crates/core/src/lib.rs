pub mod config;
pub mod dates;
pub mod error;
pub mod feed;
pub mod identifier;
pub mod item;
pub mod types;

pub use config::parse_site_toml;
pub use error::{Error, Result};
pub use feed::{ResolvedItem, parse_feed, prepare};
pub use item::{Category, PressItem, RawPressItem};
pub use types::*;
