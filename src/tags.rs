//! Recognized playlist tags

/// Tags the line parser understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Header,
    TargetDuration,
    MediaSequence,
    ProgramDateTime,
    Media,
    PlaylistType,
    Key,
    StreamInf,
    Version,
    AllowCache,
    EndList,
    Inf,
    IFramesOnly,
    ByteRange,
    IFrameStreamInf,
    Discontinuity,
    CueOutCont,
    IndependentSegments,
}

/// Dispatch table, most specific literal first.
///
/// Longer literals come before any literal they extend, so a shorter tag
/// never claims a longer one's line.
const TAG_TABLE: &[(&str, Tag)] = &[
    ("#EXT-X-INDEPENDENT-SEGMENTS", Tag::IndependentSegments),
    ("#EXT-X-I-FRAME-STREAM-INF", Tag::IFrameStreamInf),
    ("#EXT-X-PROGRAM-DATE-TIME", Tag::ProgramDateTime),
    ("#EXT-X-TARGETDURATION", Tag::TargetDuration),
    ("#EXT-X-MEDIA-SEQUENCE", Tag::MediaSequence),
    ("#EXT-X-DISCONTINUITY", Tag::Discontinuity),
    ("#EXT-X-I-FRAMES-ONLY", Tag::IFramesOnly),
    ("#EXT-X-PLAYLIST-TYPE", Tag::PlaylistType),
    ("#EXT-X-CUE-OUT-CONT", Tag::CueOutCont),
    ("#EXT-X-ALLOW-CACHE", Tag::AllowCache),
    ("#EXT-X-STREAM-INF", Tag::StreamInf),
    ("#EXT-X-BYTERANGE", Tag::ByteRange),
    ("#EXT-X-VERSION", Tag::Version),
    ("#EXT-X-ENDLIST", Tag::EndList),
    ("#EXT-X-MEDIA", Tag::Media),
    ("#EXT-X-KEY", Tag::Key),
    ("#EXTINF", Tag::Inf),
    ("#EXTM3U", Tag::Header),
];

impl Tag {
    /// Classify a trimmed line.
    ///
    /// Returns the tag and the text after its `:` (empty for bare tags).
    /// A literal only matches when followed by `:` or the end of the line.
    pub fn classify(line: &str) -> Option<(Tag, &str)> {
        TAG_TABLE.iter().find_map(|&(literal, tag)| {
            let rest = line.strip_prefix(literal)?;
            if rest.is_empty() {
                Some((tag, rest))
            } else {
                rest.strip_prefix(':').map(|value| (tag, value))
            }
        })
    }

    /// The `#`-prefixed literal for this tag
    pub fn literal(self) -> &'static str {
        TAG_TABLE
            .iter()
            .find(|&&(_, tag)| tag == self)
            .map(|&(literal, _)| literal)
            .unwrap_or_default()
    }

    /// Tags whose value continues on the following URI line
    pub fn is_value_prefix(self) -> bool {
        matches!(self, Tag::Inf | Tag::StreamInf | Tag::IFrameStreamInf)
    }
}
