//! Built-in protocol version rules
//!
//! Each rule looks at one line and the declared version, nothing else.

use std::fmt;

use crate::attributes::AttributeList;
use crate::playlist::SegmentDuration;
use crate::tags::Tag;

type CheckFn = dyn Fn(&str, f64) -> Option<String> + Send + Sync;

/// A named predicate over `(line, declared version)`.
///
/// Returns a message when the line is not allowed at that version.
pub struct VersionRule {
    name: String,
    check: Box<CheckFn>,
}

impl VersionRule {
    pub fn new<F>(name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&str, f64) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            check: Box::new(check),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn check(&self, line: &str, version: f64) -> Option<String> {
        (self.check)(line, version)
    }
}

impl fmt::Debug for VersionRule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("VersionRule")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

pub const KEY_IV: &str = "key-iv";
pub const FRACTIONAL_EXTINF: &str = "fractional-extinf";
pub const BYTERANGE_IFRAMES: &str = "byterange-iframes";

/// The default registry, in evaluation order
pub fn builtin_rules() -> Vec<VersionRule> {
    vec![
        VersionRule::new(KEY_IV, key_iv),
        VersionRule::new(FRACTIONAL_EXTINF, fractional_extinf),
        VersionRule::new(BYTERANGE_IFRAMES, byterange_iframes),
    ]
}

/// EXT-X-KEY with an IV attribute needs version 2
pub fn key_iv(line: &str, version: f64) -> Option<String> {
    let (Tag::Key, value) = Tag::classify(line)? else {
        return None;
    };
    // A malformed list is reported by the parser, not here
    let attrs = AttributeList::parse(value).ok()?;
    (attrs.contains("IV") && version < 2.0).then(|| {
        "Change the protocol version to 2 or higher, or remove the IV attribute".to_string()
    })
}

/// EXTINF with a fractional duration needs version 3
pub fn fractional_extinf(line: &str, version: f64) -> Option<String> {
    let (Tag::Inf, value) = Tag::classify(line)? else {
        return None;
    };
    let duration = value.split(',').next().unwrap_or_default().trim();

    let Some(parsed) = SegmentDuration::parse(duration) else {
        return Some(format!("EXTINF duration {:?} is not a number", duration));
    };
    (parsed.is_fractional() && version < 3.0).then(|| {
        "Change the protocol version to 3 or higher, or use integer EXTINF durations".to_string()
    })
}

/// BYTERANGE and EXT-X-I-FRAMES-ONLY need version 4
pub fn byterange_iframes(line: &str, version: f64) -> Option<String> {
    let uses_feature = line.contains("BYTERANGE")
        || matches!(Tag::classify(line), Some((Tag::IFramesOnly, _)));
    (uses_feature && version < 4.0).then(|| {
        "Change the protocol version to 4 or higher, or remove BYTERANGE and I-FRAMES-ONLY"
            .to_string()
    })
}
