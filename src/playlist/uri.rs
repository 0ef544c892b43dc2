//! Relative URI resolution against a playlist's base URI

use url::Url;

use super::model::{Document, EncryptionKey, IFrameReference, Segment, VariantReference};
use crate::error::{PlaylistError, Result};

/// Resolve `uri` against `base`.
///
/// Absolute URIs are returned unchanged; relative ones are joined onto the
/// base the way a browser would.
pub fn resolve(base: Option<&str>, uri: &str) -> Result<String> {
    match Url::parse(uri) {
        Ok(_) => return Ok(uri.to_string()),
        Err(url::ParseError::RelativeUrlWithoutBase) => {}
        Err(source) => {
            return Err(PlaylistError::InvalidUri {
                uri: uri.to_string(),
                source,
            })
        }
    }

    let base = base.ok_or_else(|| PlaylistError::MissingBaseUri(uri.to_string()))?;
    Url::parse(base)
        .and_then(|b| b.join(uri))
        .map(String::from)
        .map_err(|source| PlaylistError::InvalidUri {
            uri: format!("{} + {}", base, uri),
            source,
        })
}

impl Segment {
    pub fn absolute_uri(&self, base: Option<&str>) -> Result<String> {
        resolve(base, &self.uri)
    }
}

impl VariantReference {
    pub fn absolute_uri(&self, base: Option<&str>) -> Result<String> {
        resolve(base, &self.resource)
    }
}

impl IFrameReference {
    pub fn absolute_uri(&self, base: Option<&str>) -> Result<String> {
        resolve(base, &self.uri)
    }
}

impl EncryptionKey {
    /// `None` when the key carries no URI (e.g. METHOD=NONE)
    pub fn absolute_uri(&self, base: Option<&str>) -> Result<Option<String>> {
        self.uri.as_deref().map(|uri| resolve(base, uri)).transpose()
    }
}

impl Document {
    /// Resolve `uri` against this document's base URI
    pub fn absolute_uri(&self, uri: &str) -> Result<String> {
        resolve(self.base_uri.as_deref(), uri)
    }

    /// Absolute URIs of every segment, in playlist order
    pub fn segment_uris(&self) -> Result<Vec<String>> {
        self.segments
            .iter()
            .map(|s| s.absolute_uri(self.base_uri.as_deref()))
            .collect()
    }

    /// Absolute URIs of every variant, in playlist order
    pub fn playlist_uris(&self) -> Result<Vec<String>> {
        self.playlists
            .iter()
            .map(|p| p.absolute_uri(self.base_uri.as_deref()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_uri_is_unchanged() {
        let uri = "http://media.example.com/entire.ts";
        assert_eq!(resolve(None, uri).unwrap(), uri);
        assert_eq!(resolve(Some("http://other.example.com/"), uri).unwrap(), uri);
    }

    #[test]
    fn test_relative_uri_joins_base() {
        assert_eq!(
            resolve(Some("http://example.com/path/to/"), "segment1.ts").unwrap(),
            "http://example.com/path/to/segment1.ts"
        );
        assert_eq!(
            resolve(Some("http://example.com/path/playlist.m3u8"), "../key.bin").unwrap(),
            "http://example.com/key.bin"
        );
    }

    #[test]
    fn test_relative_uri_without_base() {
        assert!(matches!(
            resolve(None, "segment1.ts"),
            Err(PlaylistError::MissingBaseUri(uri)) if uri == "segment1.ts"
        ));
    }

    #[test]
    fn test_invalid_base() {
        assert!(matches!(
            resolve(Some("not a url"), "segment1.ts"),
            Err(PlaylistError::InvalidUri { .. })
        ));
    }

    #[test]
    fn test_key_without_uri() {
        let key = EncryptionKey::new("NONE");
        assert_eq!(key.absolute_uri(None).unwrap(), None);
    }
}
