//! Normalized relative game paths
//!
//! The client requests files by relative path (`chara/equipment/...`). Paths
//! are compared case-insensitively and with forward slashes, so every
//! [`GamePath`] is stored in that normalized form.

use std::fmt;
use std::sync::Arc;

/// Maximum length in bytes the client accepts for a game path
pub const MAX_GAME_PATH_LENGTH: usize = 260;

/// Reasons a string cannot become a [`GamePath`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("Game path exceeds {MAX_GAME_PATH_LENGTH} bytes ({0} bytes)")]
    TooLong(usize),

    #[error("Game path contains non-ASCII characters: {0}")]
    NonAscii(String),
}

/// A normalized relative game path
///
/// Cloning is cheap; the string is shared.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct GamePath(Option<Arc<str>>);

impl GamePath {
    /// Normalize and wrap a path
    ///
    /// Lowercases ASCII, turns `\` into `/` and strips leading separators.
    /// An input that normalizes to nothing yields the empty path.
    pub fn new(path: &str) -> Result<Self, PathError> {
        if !path.is_ascii() {
            return Err(PathError::NonAscii(path.to_string()));
        }

        let normalized: String = path
            .trim_start_matches(['/', '\\'])
            .chars()
            .map(|c| if c == '\\' { '/' } else { c.to_ascii_lowercase() })
            .collect();

        if normalized.len() > MAX_GAME_PATH_LENGTH {
            return Err(PathError::TooLong(normalized.len()));
        }

        if normalized.is_empty() {
            Ok(Self::empty())
        } else {
            Ok(Self(Some(Arc::from(normalized))))
        }
    }

    /// The empty path
    #[inline]
    pub const fn empty() -> Self {
        Self(None)
    }

    /// Whether this is the empty path
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    /// The normalized path text (empty string for the empty path)
    pub fn as_str(&self) -> &str {
        self.0.as_deref().unwrap_or("")
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.as_str().len()
    }
}

impl fmt::Debug for GamePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GamePath({:?})", self.as_str())
    }
}

impl fmt::Display for GamePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for GamePath {
    type Error = PathError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
