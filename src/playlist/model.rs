//! Playlist data model
//!
//! The parse result of a playlist. A [`Document`] is either a media playlist
//! (an ordered list of segments) or a variant playlist (references to other
//! playlists); [`Document::kind`] tells them apart.

use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use crate::attributes::Attribute;

// helper.
macro_rules! regex {
    ($re:literal $(,)?) => {{
        static RE: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
        RE.get_or_init(|| regex::Regex::new($re).unwrap())
    }};
}

/// Which of the two playlist shapes a document holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaylistKind {
    Media,
    Variant,
}

/// EXTINF duration, keeping the precision of the source text
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SegmentDuration {
    /// Literal had no fractional part
    Integer(u64),
    /// Literal had a decimal point
    Float(f64),
}

impl SegmentDuration {
    /// Parse a duration literal.
    ///
    /// Accepts `digits` or `digits.digits` only: no sign, no exponent, no
    /// bare leading or trailing decimal point. A literal containing a decimal
    /// point is a float, anything else an unsigned integer.
    pub fn parse(text: &str) -> Option<Self> {
        if !regex!(r"^\d+(\.\d+)?$").is_match(text) {
            return None;
        }
        if text.contains('.') {
            text.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && *v >= 0.0)
                .map(SegmentDuration::Float)
        } else {
            text.parse::<u64>().ok().map(SegmentDuration::Integer)
        }
    }

    pub fn as_secs_f64(self) -> f64 {
        match self {
            SegmentDuration::Integer(v) => v as f64,
            SegmentDuration::Float(v) => v,
        }
    }

    pub fn is_fractional(self) -> bool {
        matches!(self, SegmentDuration::Float(_))
    }
}

impl fmt::Display for SegmentDuration {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            SegmentDuration::Integer(v) => write!(f, "{}", v),
            // Keep the decimal point so the value re-parses as a float
            SegmentDuration::Float(v) if v.fract() == 0.0 => write!(f, "{:.1}", v),
            SegmentDuration::Float(v) => write!(f, "{}", v),
        }
    }
}

/// EXT-X-BYTERANGE value: `<length>[@<offset>]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ByteRange {
    pub length: u64,
    pub offset: Option<u64>,
}

impl ByteRange {
    pub fn parse(text: &str) -> Option<Self> {
        let (length, offset) = match text.split_once('@') {
            Some((length, offset)) => (length, Some(offset.trim().parse().ok()?)),
            None => (text, None),
        };
        Some(Self {
            length: length.trim().parse().ok()?,
            offset,
        })
    }
}

impl fmt::Display for ByteRange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.offset {
            Some(offset) => write!(f, "{}@{}", self.length, offset),
            None => write!(f, "{}", self.length),
        }
    }
}

/// RESOLUTION attribute: `<width>x<height>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub fn parse(text: &str) -> Option<Self> {
        let (width, height) = text.split_once('x')?;
        Some(Self {
            width: width.parse().ok()?,
            height: height.parse().ok()?,
        })
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// One media segment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    pub uri: String,
    pub duration: Option<SegmentDuration>,
    pub title: Option<String>,
    pub byterange: Option<ByteRange>,
    pub program_date_time: Option<DateTime<FixedOffset>>,
    /// Preceded by EXT-X-DISCONTINUITY
    pub discontinuity: bool,
    /// Preceded by EXT-X-CUE-OUT-CONT
    pub cue_out: bool,
}

impl Segment {
    pub fn new(uri: impl Into<String>, duration: Option<SegmentDuration>) -> Self {
        Self {
            uri: uri.into(),
            duration,
            title: None,
            byterange: None,
            program_date_time: None,
            discontinuity: false,
            cue_out: false,
        }
    }
}

/// EXT-X-KEY
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncryptionKey {
    /// e.g. `AES-128`, `SAMPLE-AES`, `NONE`
    pub method: String,
    pub uri: Option<String>,
    /// Hex string as written, e.g. `0x1234`
    pub iv: Option<String>,
    /// KEYFORMAT, KEYFORMATVERSIONS and anything unrecognized
    pub extra: Vec<Attribute>,
}

impl EncryptionKey {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            uri: None,
            iv: None,
            extra: Vec::new(),
        }
    }

    pub fn is_encrypted(&self) -> bool {
        self.method != "NONE"
    }
}

/// Attributes of EXT-X-STREAM-INF / EXT-X-I-FRAME-STREAM-INF
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreamInfo {
    pub bandwidth: u64,
    pub program_id: Option<String>,
    pub codecs: Option<String>,
    pub resolution: Option<Resolution>,
    pub audio: Option<String>,
    pub video: Option<String>,
    pub subtitles: Option<String>,
    /// Attributes without a dedicated field, in source order
    pub extra: Vec<Attribute>,
}

impl StreamInfo {
    pub fn new(bandwidth: u64) -> Self {
        Self {
            bandwidth,
            program_id: None,
            codecs: None,
            resolution: None,
            audio: None,
            video: None,
            subtitles: None,
            extra: Vec::new(),
        }
    }
}

/// One entry of a variant playlist
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariantReference {
    /// URI of the sub-playlist
    pub resource: String,
    pub stream_info: StreamInfo,
}

/// EXT-X-I-FRAME-STREAM-INF entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IFrameReference {
    pub uri: String,
    pub stream_info: StreamInfo,
}

/// EXT-X-MEDIA rendition
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AlternateMedia {
    pub media_type: Option<String>,
    pub group_id: Option<String>,
    pub language: Option<String>,
    pub name: Option<String>,
    pub default: Option<String>,
    pub autoselect: Option<String>,
    pub forced: Option<String>,
    pub characteristics: Option<String>,
    pub uri: Option<String>,
    pub extra: Vec<Attribute>,
}

fn is_yes(flag: &Option<String>) -> bool {
    flag.as_deref()
        .is_some_and(|v| v.eq_ignore_ascii_case("YES"))
}

impl AlternateMedia {
    pub fn is_default(&self) -> bool {
        is_yes(&self.default)
    }

    pub fn is_autoselect(&self) -> bool {
        is_yes(&self.autoselect)
    }

    pub fn is_forced(&self) -> bool {
        is_yes(&self.forced)
    }
}

/// Parse result root
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Document {
    /// Latched once any stream-reference tag is seen
    pub is_variant: bool,
    pub target_duration: Option<u64>,
    pub media_sequence: Option<u64>,
    pub version: Option<f64>,
    /// Raw EXT-X-ALLOW-CACHE value
    pub allow_cache: Option<String>,
    /// Last EXT-X-KEY seen
    pub key: Option<EncryptionKey>,
    pub playlist_type: Option<String>,
    pub is_endlist: bool,
    pub is_i_frames_only: bool,
    pub is_independent_segments: bool,
    pub segments: Vec<Segment>,
    pub playlists: Vec<VariantReference>,
    pub iframe_playlists: Vec<IFrameReference>,
    pub media: Vec<AlternateMedia>,
    /// Base for resolving relative URIs; supplied by the caller
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_uri: Option<String>,
}

impl Document {
    pub fn kind(&self) -> PlaylistKind {
        if self.is_variant {
            PlaylistKind::Variant
        } else {
            PlaylistKind::Media
        }
    }

    /// Sum of all segment durations in seconds
    pub fn total_duration(&self) -> f64 {
        self.segments
            .iter()
            .filter_map(|s| s.duration)
            .map(SegmentDuration::as_secs_f64)
            .sum()
    }

    /// EXT-X-ALLOW-CACHE as a boolean, case-insensitive
    pub fn allows_cache(&self) -> Option<bool> {
        let value = self.allow_cache.as_deref()?;
        if value.eq_ignore_ascii_case("YES") {
            Some(true)
        } else if value.eq_ignore_ascii_case("NO") {
            Some(false)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_keeps_source_shape() {
        assert_eq!(SegmentDuration::parse("10"), Some(SegmentDuration::Integer(10)));
        assert_eq!(SegmentDuration::parse("10.5"), Some(SegmentDuration::Float(10.5)));
        assert_eq!(SegmentDuration::parse("abc"), None);
        assert_eq!(SegmentDuration::parse("-1"), None);
        for literal in ["+5", "10.", ".5", "1e3", " 5"] {
            assert_eq!(SegmentDuration::parse(literal), None, "{:?}", literal);
        }

        assert_eq!(SegmentDuration::Integer(5220).to_string(), "5220");
        assert_eq!(SegmentDuration::Float(9.009).to_string(), "9.009");
        assert_eq!(SegmentDuration::Float(10.0).to_string(), "10.0");
    }

    #[test]
    fn test_byterange() {
        assert_eq!(
            ByteRange::parse("75232@0"),
            Some(ByteRange {
                length: 75232,
                offset: Some(0)
            })
        );
        assert_eq!(
            ByteRange::parse("82112"),
            Some(ByteRange {
                length: 82112,
                offset: None
            })
        );
        assert_eq!(ByteRange::parse("12@x"), None);
        assert_eq!(ByteRange::parse("82112@752321").unwrap().to_string(), "82112@752321");
    }

    #[test]
    fn test_resolution() {
        let res = Resolution::parse("1280x720").unwrap();
        assert_eq!((res.width, res.height), (1280, 720));
        assert_eq!(res.to_string(), "1280x720");
        assert_eq!(Resolution::parse("1280"), None);
    }

    #[test]
    fn test_allows_cache_is_case_insensitive() {
        let mut doc = Document {
            allow_cache: Some("yes".to_string()),
            ..Default::default()
        };
        assert_eq!(doc.allows_cache(), Some(true));
        doc.allow_cache = Some("No".to_string());
        assert_eq!(doc.allows_cache(), Some(false));
        doc.allow_cache = None;
        assert_eq!(doc.allows_cache(), None);
    }

    #[test]
    fn test_total_duration() {
        let doc = Document {
            segments: vec![
                Segment::new("a.ts", Some(SegmentDuration::Integer(10))),
                Segment::new("b.ts", Some(SegmentDuration::Float(4.5))),
                Segment::new("c.ts", None),
            ],
            ..Default::default()
        };
        assert_eq!(doc.total_duration(), 14.5);
        assert_eq!(doc.kind(), PlaylistKind::Media);
    }

    #[test]
    fn test_media_flags() {
        let media = AlternateMedia {
            default: Some("YES".to_string()),
            autoselect: Some("no".to_string()),
            ..Default::default()
        };
        assert!(media.is_default());
        assert!(!media.is_autoselect());
        assert!(!media.is_forced());
    }
}
