use std::fmt;
use std::path::Path;

use sha2::{Digest, Sha256};

/// Stable identity under which an album's bookmark is stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AlbumKey(String);

impl AlbumKey {
    /// Number of hex digits kept from the folder hash.
    const HASH_LEN: usize = 16;

    /// The descriptor's explicit id when it has one, else a short hash of the folder path.
    pub fn derive(album_id: Option<&str>, folder: &Path) -> Self {
        match album_id.map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) => Self(id.to_string()),
            None => Self::from_folder(folder),
        }
    }

    pub fn from_folder(folder: &Path) -> Self {
        let digest = Sha256::digest(folder.to_string_lossy().as_bytes());
        let mut hex = format!("{:x}", digest);
        hex.truncate(Self::HASH_LEN);
        Self(hex)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AlbumKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AlbumKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
