use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpriteKeyError {
    #[error("image key must not be empty")]
    Empty,
    #[error("image key must not start with '/'")]
    LeadingSlash,
    #[error("image key must not contain '\\\\'")]
    Backslash,
    #[error("image key must not contain '..'")]
    ParentTraversal,
    #[error("image key contains invalid character '{character}'")]
    InvalidCharacter { character: char },
}

pub fn validate_sprite_key(key: &str) -> Result<(), SpriteKeyError> {
    if key.is_empty() {
        return Err(SpriteKeyError::Empty);
    }
    if key.starts_with('/') {
        return Err(SpriteKeyError::LeadingSlash);
    }
    if key.contains('\\') {
        return Err(SpriteKeyError::Backslash);
    }
    if key.contains("..") {
        return Err(SpriteKeyError::ParentTraversal);
    }
    for ch in key.chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() || matches!(ch, '_' | '/' | '-') {
            continue;
        }
        return Err(SpriteKeyError::InvalidCharacter { character: ch });
    }
    Ok(())
}

/// Name of an image the drawing collaborator resolves to pixels.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageKey(String);

impl ImageKey {
    pub fn new(key: impl Into<String>) -> Result<Self, SpriteKeyError> {
        let key = key.into();
        validate_sprite_key(&key)?;
        Ok(Self(key))
    }

    /// For keys assembled from already-validated parts.
    pub(crate) fn trusted(key: String) -> Self {
        debug_assert!(validate_sprite_key(&key).is_ok(), "bad image key {key}");
        Self(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn variant(&self, suffix: &str) -> Self {
        Self::trusted(format!("{}_{suffix}", self.0))
    }
}

impl fmt::Display for ImageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
