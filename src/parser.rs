//! Line parser
//!
//! Turns playlist text into a [`Document`] in a single forward pass. The only
//! state carried between lines, besides the document itself, is the pending
//! value-prefix tag (EXTINF, EXT-X-STREAM-INF, EXT-X-I-FRAME-STREAM-INF)
//! waiting for its URI line, plus the segment-level tags collected for the
//! next segment.

use chrono::{DateTime, FixedOffset};
use tracing::{debug, trace, warn};

use crate::attributes::AttributeList;
use crate::error::{PlaylistError, Result};
use crate::playlist::{
    AlternateMedia, ByteRange, Document, EncryptionKey, IFrameReference, Resolution, Segment,
    SegmentDuration, StreamInfo, VariantReference,
};
use crate::tags::Tag;

/// Parse playlist text.
///
/// Accepts `\n` and `\r\n` line endings. Unknown tags, comments and stray
/// URI lines are ignored.
pub fn parse(text: &str) -> Result<Document> {
    let mut parser = LineParser::default();
    for (index, line) in text.lines().enumerate() {
        parser.feed(index, line)?;
    }
    parser.finish()
}

/// Parse playlist text and record `base_uri` for URI resolution
pub fn parse_with_base_uri(text: &str, base_uri: impl Into<String>) -> Result<Document> {
    let mut document = parse(text)?;
    document.base_uri = Some(base_uri.into());
    Ok(document)
}

/// Location of the line being parsed, for error reporting
#[derive(Clone, Copy)]
struct LineRef<'a> {
    index: usize,
    text: &'a str,
}

impl LineRef<'_> {
    fn invalid_number(self) -> PlaylistError {
        PlaylistError::InvalidNumericField {
            line: self.index,
            text: self.text.to_string(),
        }
    }

    fn missing(self, attribute: &'static str) -> PlaylistError {
        PlaylistError::MissingRequiredAttribute {
            line: self.index,
            text: self.text.to_string(),
            attribute,
        }
    }

    fn number<T: std::str::FromStr>(self, value: &str) -> Result<T> {
        value.trim().parse().map_err(|_| self.invalid_number())
    }

    fn attributes(self, value: &str) -> Result<AttributeList> {
        AttributeList::parse(value).map_err(|source| PlaylistError::MalformedAttributeList {
            line: self.index,
            text: self.text.to_string(),
            source,
        })
    }
}

/// Entity waiting for its URI line
#[derive(Debug)]
enum PendingKind {
    Segment {
        duration: Option<SegmentDuration>,
        title: Option<String>,
    },
    Variant(StreamInfo),
    IFrame(StreamInfo),
}

#[derive(Debug)]
struct Pending {
    kind: PendingKind,
    line: usize,
    text: String,
}

impl Pending {
    fn unterminated(self) -> PlaylistError {
        PlaylistError::UnterminatedTag {
            line: self.line,
            text: self.text,
        }
    }
}

/// Segment-level tags seen since the last committed segment
#[derive(Debug, Default)]
struct SegmentTags {
    byterange: Option<ByteRange>,
    program_date_time: Option<DateTime<FixedOffset>>,
    discontinuity: bool,
    cue_out: bool,
    /// Line of the first tag collected
    first_line: Option<usize>,
}

impl SegmentTags {
    fn seen(&mut self, line: LineRef) -> &mut Self {
        self.first_line.get_or_insert(line.index);
        self
    }

    /// Drop tags that have no media segment to attach to
    fn discard(&mut self, reason: &str) {
        if let Some(first_line) = std::mem::take(self).first_line {
            warn!(line = first_line, "dropping segment tags {}", reason);
        }
    }
}

#[derive(Debug, Default)]
struct LineParser {
    document: Document,
    pending: Option<Pending>,
    segment_tags: SegmentTags,
}

impl LineParser {
    fn feed(&mut self, index: usize, raw: &str) -> Result<()> {
        let text = raw.trim();
        if text.is_empty() {
            return Ok(());
        }
        let line = LineRef { index, text };

        match Tag::classify(text) {
            Some((tag, value)) => self.handle_tag(tag, value, line),
            None if text.starts_with('#') => {
                debug!(line = index, "ignoring unrecognized tag or comment: {}", text);
                Ok(())
            }
            None => {
                self.handle_uri(text);
                Ok(())
            }
        }
    }

    fn handle_tag(&mut self, tag: Tag, value: &str, line: LineRef) -> Result<()> {
        trace!(line = line.index, ?tag, "dispatching tag");

        // A new value-prefix tag replaces the expectation of a URI line
        if tag.is_value_prefix() {
            if let Some(pending) = self.pending.take() {
                return Err(pending.unterminated());
            }
        }

        let doc = &mut self.document;
        match tag {
            Tag::Header => {}
            Tag::TargetDuration => doc.target_duration = Some(line.number(value)?),
            Tag::MediaSequence => doc.media_sequence = Some(line.number(value)?),
            Tag::Version => {
                let version: f64 = line.number(value)?;
                if !version.is_finite() {
                    return Err(line.invalid_number());
                }
                doc.version = Some(version);
            }
            Tag::AllowCache => doc.allow_cache = Some(value.trim().to_string()),
            Tag::PlaylistType => doc.playlist_type = Some(value.trim().to_string()),
            Tag::EndList => doc.is_endlist = true,
            Tag::IFramesOnly => doc.is_i_frames_only = true,
            Tag::IndependentSegments => doc.is_independent_segments = true,
            Tag::Key => {
                let key = parse_key(line.attributes(value)?, line)?;
                if doc.key.is_some() {
                    debug!(line = line.index, "replacing previous EXT-X-KEY");
                }
                doc.key = Some(key);
            }
            Tag::Media => doc.media.push(parse_media(line.attributes(value)?)),
            Tag::Inf => {
                let (duration, title) = parse_extinf(value, line)?;
                self.expect_uri(PendingKind::Segment { duration, title }, line);
            }
            Tag::StreamInf => {
                doc.is_variant = true;
                let info = parse_stream_info(line.attributes(value)?, line)?;
                self.expect_uri(PendingKind::Variant(info), line);
            }
            Tag::IFrameStreamInf => {
                doc.is_variant = true;
                let mut attrs = line.attributes(value)?;
                let uri = attrs.take("URI");
                let stream_info = parse_stream_info(attrs, line)?;
                match uri {
                    Some(uri) => doc.iframe_playlists.push(IFrameReference { uri, stream_info }),
                    None => self.expect_uri(PendingKind::IFrame(stream_info), line),
                }
            }
            Tag::ByteRange => {
                let range = ByteRange::parse(value.trim()).ok_or_else(|| line.invalid_number())?;
                self.segment_tags.seen(line).byterange = Some(range);
            }
            Tag::ProgramDateTime => {
                let pdt = parse_date_time(value, line)?;
                self.segment_tags.seen(line).program_date_time = Some(pdt);
            }
            Tag::Discontinuity => self.segment_tags.seen(line).discontinuity = true,
            Tag::CueOutCont => self.segment_tags.seen(line).cue_out = true,
        }

        Ok(())
    }

    fn expect_uri(&mut self, kind: PendingKind, line: LineRef) {
        self.pending = Some(Pending {
            kind,
            line: line.index,
            text: line.text.to_string(),
        });
    }

    fn handle_uri(&mut self, uri: &str) {
        let Some(pending) = self.pending.take() else {
            debug!("ignoring URI line with no pending tag: {}", uri);
            return;
        };

        let doc = &mut self.document;
        match pending.kind {
            PendingKind::Segment { duration, title } => {
                let tags = std::mem::take(&mut self.segment_tags);
                doc.segments.push(Segment {
                    uri: uri.to_string(),
                    duration,
                    title,
                    byterange: tags.byterange,
                    program_date_time: tags.program_date_time,
                    discontinuity: tags.discontinuity,
                    cue_out: tags.cue_out,
                });
            }
            PendingKind::Variant(stream_info) => {
                self.segment_tags.discard("inside a variant stream entry");
                doc.playlists.push(VariantReference {
                    resource: uri.to_string(),
                    stream_info,
                });
            }
            PendingKind::IFrame(stream_info) => {
                self.segment_tags.discard("inside an I-frame stream entry");
                doc.iframe_playlists.push(IFrameReference {
                    uri: uri.to_string(),
                    stream_info,
                });
            }
        }
    }

    fn finish(mut self) -> Result<Document> {
        if let Some(pending) = self.pending {
            return Err(pending.unterminated());
        }
        self.segment_tags.discard("with no following segment");
        debug!(
            segments = self.document.segments.len(),
            playlists = self.document.playlists.len(),
            variant = self.document.is_variant,
            "parsed playlist"
        );
        Ok(self.document)
    }
}

/// `<duration>,[<title>]`; an empty duration is absent, a quoted title is unquoted
fn parse_extinf(value: &str, line: LineRef) -> Result<(Option<SegmentDuration>, Option<String>)> {
    let (duration, title) = value.split_once(',').unwrap_or((value, ""));

    let duration = duration.trim();
    let duration = if duration.is_empty() {
        None
    } else {
        Some(SegmentDuration::parse(duration).ok_or_else(|| line.invalid_number())?)
    };

    let title = title.trim();
    let title = title
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(title);
    let title = (!title.is_empty()).then(|| title.to_string());

    Ok((duration, title))
}

fn parse_date_time(value: &str, line: LineRef) -> Result<DateTime<FixedOffset>> {
    let value = value.trim();
    DateTime::parse_from_rfc3339(value)
        .or_else(|_| DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f%z"))
        .map_err(|_| PlaylistError::InvalidDateTime {
            line: line.index,
            text: line.text.to_string(),
        })
}

fn parse_key(mut attrs: AttributeList, line: LineRef) -> Result<EncryptionKey> {
    let method = attrs.take("METHOD").ok_or_else(|| line.missing("METHOD"))?;
    Ok(EncryptionKey {
        method,
        uri: attrs.take("URI"),
        iv: attrs.take("IV"),
        extra: attrs.into_vec(),
    })
}

fn parse_stream_info(mut attrs: AttributeList, line: LineRef) -> Result<StreamInfo> {
    let bandwidth = attrs
        .take("BANDWIDTH")
        .ok_or_else(|| line.missing("BANDWIDTH"))?;
    let resolution = match attrs.take("RESOLUTION") {
        Some(res) => Some(Resolution::parse(&res).ok_or_else(|| line.invalid_number())?),
        None => None,
    };

    Ok(StreamInfo {
        bandwidth: line.number(&bandwidth)?,
        program_id: attrs.take("PROGRAM-ID"),
        codecs: attrs.take("CODECS"),
        resolution,
        audio: attrs.take("AUDIO"),
        video: attrs.take("VIDEO"),
        subtitles: attrs.take("SUBTITLES"),
        extra: attrs.into_vec(),
    })
}

fn parse_media(mut attrs: AttributeList) -> AlternateMedia {
    AlternateMedia {
        media_type: attrs.take("TYPE"),
        group_id: attrs.take("GROUP-ID"),
        language: attrs.take("LANGUAGE"),
        name: attrs.take("NAME"),
        default: attrs.take("DEFAULT"),
        autoselect: attrs.take("AUTOSELECT"),
        forced: attrs.take("FORCED"),
        characteristics: attrs.take("CHARACTERISTICS"),
        uri: attrs.take("URI"),
        extra: attrs.into_vec(),
    }
}
