//! HLS playlist parsing and validation
//!
//! Parses M3U8 playlist text into a [`Document`], writes it back out, and
//! checks that a playlist only uses features allowed by the protocol version
//! it declares.
//!
//! ```
//! let doc = hls_playlist::parse("#EXTM3U\n#EXT-X-TARGETDURATION:10\n#EXTINF:9.5,\na.ts\n").unwrap();
//! assert_eq!(doc.segments[0].uri, "a.ts");
//!
//! let violations = hls_playlist::validate(&["#EXT-X-VERSION:2", "#EXTINF:9.5,"]);
//! assert_eq!(violations.len(), 1);
//! ```

pub mod attributes;
pub mod config;
pub mod error;
pub(crate) mod parser;
pub mod playlist;
pub mod tags;
pub mod validation;

#[cfg(test)]
pub(crate) mod tests;

pub use attributes::{Attribute, AttributeList, AttributeListError};
pub use config::{LoggingConfig, PlaylistConfig, ValidationConfig};
pub use error::{PlaylistError, Result};
pub use parser::{parse, parse_with_base_uri};
pub use playlist::{
    AlternateMedia, ByteRange, Document, EncryptionKey, IFrameReference, PlaylistKind,
    Resolution, Segment, SegmentDuration, StreamInfo, VariantReference,
};
pub use validation::{validate, Validator, VersionRule, VersionViolation};
