//! Album catalog: descriptor parsing, title/file pairing and album identity.

mod catalog;
mod key;
mod model;

pub use catalog::{CatalogError, PLACEHOLDER_TITLE, load_album, load_descriptor};
pub use key::AlbumKey;
pub use model::{Album, AlbumDescriptor, Track};
