use std::{fmt, str::FromStr};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::KeyforgeError;

/// Separator between derivation path segments, and between the master
/// phrase and the path in a derivation input.
pub const SEPARATOR: &str = "//";

/// A hierarchical derivation label such as `diego` or `diego//stash`.
///
/// The hierarchy is purely conventional: no parent/child object exists and
/// derivation is a function of the full joined string, not a tree walk. The
/// path is nevertheless stored as explicit segments, so that a segment
/// containing a separator is rejected structurally instead of silently
/// changing the meaning of the joined form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DerivationPath {
    segments: Vec<String>,
}

impl DerivationPath {
    /// Builds a path from individual segments.
    ///
    /// # Errors
    ///
    /// Returns [`KeyforgeError::InvalidPathSegment`] if no segments are
    /// given, or if any segment is empty or contains a `/`. A `/` anywhere
    /// in a segment would be re-interpreted as a junction marker by
    /// SURI-speaking tools, so it is rejected outright.
    pub fn new<I, S>(segments: I) -> Result<Self, KeyforgeError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(KeyforgeError::InvalidPathSegment(String::new()));
        }
        for segment in &segments {
            if segment.is_empty() || segment.contains('/') {
                return Err(KeyforgeError::InvalidPathSegment(segment.clone()));
            }
        }
        Ok(Self { segments })
    }

    /// The individual path segments, in order.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns this path extended with one more segment.
    ///
    /// # Errors
    ///
    /// Returns [`KeyforgeError::InvalidPathSegment`] if the new segment is
    /// empty or contains a `/`.
    pub fn child(&self, segment: &str) -> Result<Self, KeyforgeError> {
        let mut segments = self.segments.clone();
        segments.push(segment.to_owned());
        Self::new(segments)
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join(SEPARATOR))
    }
}

impl FromStr for DerivationPath {
    type Err = KeyforgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.split(SEPARATOR))
    }
}

impl Serialize for DerivationPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DerivationPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
