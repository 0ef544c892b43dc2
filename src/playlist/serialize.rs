//! Playlist serialization
//!
//! Writes a [`Document`] back to canonical playlist text. Media playlists
//! emit their headers in a fixed order followed by the segments; variant
//! playlists emit renditions before stream references.

use std::fmt;

use chrono::SecondsFormat;

use super::model::{
    AlternateMedia, Document, EncryptionKey, IFrameReference, PlaylistKind, Segment, StreamInfo,
};
use crate::attributes::{Attribute, AttributeList};
use crate::tags::Tag;

impl Document {
    /// Serialize to playlist text
    pub fn dumps(&self) -> String {
        match self.kind() {
            PlaylistKind::Media => generate_media_playlist(self),
            PlaylistKind::Variant => generate_variant_playlist(self),
        }
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.dumps())
    }
}

fn tag_line(output: &mut String, tag: Tag, value: impl fmt::Display) {
    output.push_str(&format!("{}:{}\n", tag.literal(), value));
}

fn bare_tag_line(output: &mut String, tag: Tag) {
    output.push_str(tag.literal());
    output.push('\n');
}

fn push_opt(attrs: &mut Vec<Attribute>, name: &str, value: &Option<String>, quoted: bool) {
    if let Some(value) = value {
        attrs.push(Attribute::new(name, value.as_str(), quoted));
    }
}

/// Generate media playlist text
///
/// Headers: media-sequence, allow-cache, key, target-duration, in that order.
pub fn generate_media_playlist(document: &Document) -> String {
    let mut output = String::new();

    bare_tag_line(&mut output, Tag::Header);
    if let Some(version) = document.version {
        tag_line(&mut output, Tag::Version, version);
    }
    if let Some(sequence) = document.media_sequence {
        tag_line(&mut output, Tag::MediaSequence, sequence);
    }
    if let Some(allow_cache) = &document.allow_cache {
        tag_line(&mut output, Tag::AllowCache, allow_cache);
    }
    if let Some(key) = &document.key {
        tag_line(&mut output, Tag::Key, key_attributes(key));
    }
    if let Some(target) = document.target_duration {
        tag_line(&mut output, Tag::TargetDuration, target);
    }
    if let Some(playlist_type) = &document.playlist_type {
        tag_line(&mut output, Tag::PlaylistType, playlist_type);
    }
    if document.is_i_frames_only {
        bare_tag_line(&mut output, Tag::IFramesOnly);
    }
    if document.is_independent_segments {
        bare_tag_line(&mut output, Tag::IndependentSegments);
    }

    for segment in &document.segments {
        push_segment(&mut output, segment);
    }

    if document.is_endlist {
        bare_tag_line(&mut output, Tag::EndList);
    }

    output
}

fn push_segment(output: &mut String, segment: &Segment) {
    if segment.discontinuity {
        bare_tag_line(output, Tag::Discontinuity);
    }
    if segment.cue_out {
        bare_tag_line(output, Tag::CueOutCont);
    }
    if let Some(pdt) = &segment.program_date_time {
        tag_line(
            output,
            Tag::ProgramDateTime,
            pdt.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        );
    }

    let duration = segment
        .duration
        .map(|d| d.to_string())
        .unwrap_or_default();
    // An empty title reads back as no title, so write neither
    match segment.title.as_deref().filter(|t| !t.is_empty()) {
        Some(title) => tag_line(output, Tag::Inf, format!("{},\"{}\"", duration, title)),
        None => tag_line(output, Tag::Inf, format!("{},", duration)),
    }

    if let Some(byterange) = &segment.byterange {
        tag_line(output, Tag::ByteRange, byterange);
    }
    output.push_str(&segment.uri);
    output.push('\n');
}

/// Generate variant playlist text
///
/// EXT-X-MEDIA renditions come first, then one EXT-X-STREAM-INF + URI pair
/// per variant, then the I-frame playlists.
pub fn generate_variant_playlist(document: &Document) -> String {
    let mut output = String::new();

    bare_tag_line(&mut output, Tag::Header);
    if let Some(version) = document.version {
        tag_line(&mut output, Tag::Version, version);
    }
    if document.is_independent_segments {
        bare_tag_line(&mut output, Tag::IndependentSegments);
    }

    for media in &document.media {
        tag_line(&mut output, Tag::Media, media_attributes(media));
    }

    for variant in &document.playlists {
        tag_line(
            &mut output,
            Tag::StreamInf,
            stream_info_attributes(&variant.stream_info),
        );
        output.push_str(&variant.resource);
        output.push('\n');
    }

    for iframe in &document.iframe_playlists {
        tag_line(&mut output, Tag::IFrameStreamInf, iframe_attributes(iframe));
    }

    output
}

fn key_attributes(key: &EncryptionKey) -> AttributeList {
    let mut attrs = vec![Attribute::plain("METHOD", key.method.as_str())];
    push_opt(&mut attrs, "URI", &key.uri, true);
    push_opt(&mut attrs, "IV", &key.iv, false);
    attrs.extend(key.extra.iter().cloned());
    attrs.into()
}

fn stream_info_attributes(info: &StreamInfo) -> AttributeList {
    let mut attrs = Vec::new();
    push_opt(&mut attrs, "PROGRAM-ID", &info.program_id, false);
    attrs.push(Attribute::plain("BANDWIDTH", info.bandwidth.to_string()));
    push_opt(&mut attrs, "CODECS", &info.codecs, true);
    if let Some(resolution) = &info.resolution {
        attrs.push(Attribute::plain("RESOLUTION", resolution.to_string()));
    }
    push_opt(&mut attrs, "AUDIO", &info.audio, true);
    push_opt(&mut attrs, "VIDEO", &info.video, true);
    push_opt(&mut attrs, "SUBTITLES", &info.subtitles, true);
    attrs.extend(info.extra.iter().cloned());
    attrs.into()
}

fn iframe_attributes(iframe: &IFrameReference) -> AttributeList {
    let mut attrs = stream_info_attributes(&iframe.stream_info);
    attrs.push(Attribute::quoted("URI", iframe.uri.as_str()));
    attrs
}

fn media_attributes(media: &AlternateMedia) -> AttributeList {
    let mut attrs = Vec::new();
    push_opt(&mut attrs, "TYPE", &media.media_type, false);
    push_opt(&mut attrs, "GROUP-ID", &media.group_id, true);
    push_opt(&mut attrs, "LANGUAGE", &media.language, true);
    push_opt(&mut attrs, "NAME", &media.name, true);
    push_opt(&mut attrs, "DEFAULT", &media.default, false);
    push_opt(&mut attrs, "AUTOSELECT", &media.autoselect, false);
    push_opt(&mut attrs, "FORCED", &media.forced, false);
    push_opt(&mut attrs, "CHARACTERISTICS", &media.characteristics, true);
    push_opt(&mut attrs, "URI", &media.uri, true);
    attrs.extend(media.extra.iter().cloned());
    attrs.into()
}
