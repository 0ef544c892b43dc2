//! Playlist model
//!
//! This module holds the parse result and everything that reads it:
//! - The [`Document`] and its segment, variant and rendition records
//! - Serialization back to canonical playlist text
//! - Resolution of relative URIs against a base URI

pub mod model;
pub mod serialize;
pub mod uri;

pub use model::{
    AlternateMedia, ByteRange, Document, EncryptionKey, IFrameReference, PlaylistKind,
    Resolution, Segment, SegmentDuration, StreamInfo, VariantReference,
};
pub use serialize::{generate_media_playlist, generate_variant_playlist};
pub use uri::resolve;
