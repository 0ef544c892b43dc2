//! Protocol version validation over complete playlists

use crate::error::PlaylistError;
use crate::parser::parse;
use crate::tests::fixtures::*;
use crate::validation::{rules, validate, Validator, VersionViolation};

fn lines(text: &str) -> Vec<&str> {
    text.lines().collect()
}

#[test]
fn test_key_iv_requires_version_2() {
    let text = "#EXTM3U
#EXT-X-VERSION:1
#EXT-X-TARGETDURATION:10
#EXT-X-KEY:METHOD=AES-128,URI=\"https://priv.example.com/key\",IV=0x1234
#EXTINF:10,
a.ts";
    let violations = validate(&lines(text));

    assert_eq!(violations.len(), 1);
    let violation = &violations[0];
    assert_eq!(violation.line_number, 3);
    assert!(violation.line_text.starts_with("#EXT-X-KEY:"));
    assert!(violation.message.contains("version to 2 or higher"));
}

#[test]
fn test_fractional_duration_requires_version_3() {
    let template = |version: u32| {
        format!(
            "#EXTM3U\n#EXT-X-VERSION:{}\n#EXT-X-TARGETDURATION:11\n#EXTINF:10.5,\na.ts\n",
            version
        )
    };

    let violations = validate(&lines(&template(2)));
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].line_number, 3);
    assert!(violations[0].message.contains("3 or higher"));

    assert!(validate(&lines(&template(3))).is_empty());
}

#[test]
fn test_byterange_requires_version_4() {
    let text = BYTERANGE_PLAYLIST.replace("#EXT-X-VERSION:4", "#EXT-X-VERSION:3");
    let violations = validate(&lines(&text));

    // Fractional durations are fine at 3, the three BYTERANGE lines are not
    assert_eq!(violations.len(), 3);
    assert!(violations
        .iter()
        .all(|v| v.line_text.starts_with("#EXT-X-BYTERANGE")));

    assert!(validate(&lines(BYTERANGE_PLAYLIST)).is_empty());
}

#[test]
fn test_non_numeric_duration_is_always_reported() {
    let text = "#EXTM3U\n#EXT-X-VERSION:7\n#EXTINF:forever,\na.ts";
    let violations = validate(&lines(text));
    assert_eq!(violations.len(), 1);
    assert!(violations[0].message.contains("not a number"));
}

#[test]
fn test_fixtures_without_version_are_noop() {
    for text in [
        SIMPLE_PLAYLIST,
        SLIDING_WINDOW_PLAYLIST,
        PLAYLIST_WITH_ENCRYPTED_SEGMENTS,
        RELATIVE_PLAYLIST,
        VARIANT_PLAYLIST,
        WINDOWS_PLAYLIST,
    ] {
        assert!(validate(&lines(text)).is_empty());
    }
}

/// A duration the parser accepts is never reported as non-numeric.
#[test]
fn test_parser_and_validator_agree_on_durations() {
    for literal in ["10", "10.5", "0.001", "10.", ".5", "+5", "1e3", "-1", "ten"] {
        let extinf = format!("#EXTINF:{},", literal);
        let parsed = parse(&format!("{}\na.ts", extinf));
        let flagged = validate(&["#EXT-X-VERSION:7", extinf.as_str()])
            .iter()
            .any(|v| v.message.contains("not a number"));

        assert_eq!(parsed.is_ok(), !flagged, "duration {:?}", literal);
        if let Err(err) = parsed {
            assert!(
                matches!(err, PlaylistError::InvalidNumericField { line: 0, .. }),
                "duration {:?}: {}",
                literal,
                err
            );
        }
    }
}

/// A rule judges a line the same way alone as inside its document.
#[test]
fn test_rules_depend_only_on_their_line() {
    let text = "#EXTM3U
#EXT-X-VERSION:1
#EXT-X-KEY:METHOD=AES-128,URI=\"k\",IV=0x1
#EXTINF:4.5,
#EXT-X-BYTERANGE:10@0
a.ts
#EXTINF:x,
b.ts";
    let all = lines(text);
    let full: Vec<VersionViolation> = validate(&all);

    for (index, line) in all.iter().enumerate() {
        if index == 1 {
            continue;
        }
        let alone = validate(&["#EXT-X-VERSION:1", *line]);
        let expected: Vec<&String> = full
            .iter()
            .filter(|v| v.line_number == index)
            .map(|v| &v.message)
            .collect();
        let actual: Vec<&String> = alone
            .iter()
            .filter(|v| v.line_number == 1)
            .map(|v| &v.message)
            .collect();
        assert_eq!(actual, expected, "line {}: {}", index, line);
    }
}

#[test]
fn test_each_builtin_rule_fires_once() {
    let text = "#EXT-X-VERSION:1
#EXT-X-KEY:METHOD=AES-128,IV=0x1
#EXTINF:4.5,
#EXT-X-I-FRAMES-ONLY";
    let validator = Validator::new();
    let violations = validator.validate(&lines(text));
    assert_eq!(violations.len(), 3);

    for name in [rules::KEY_IV, rules::FRACTIONAL_EXTINF, rules::BYTERANGE_IFRAMES] {
        let config = crate::config::ValidationConfig {
            disabled_rules: vec![name.to_string()],
        };
        let reduced = Validator::from_config(&config).unwrap();
        assert_eq!(reduced.validate(&lines(text)).len(), 2, "disabling {}", name);
    }
}

#[test]
fn test_repeated_version_uses_the_last_declaration() {
    let text = "#EXTM3U\n#EXT-X-VERSION:2\n#EXT-X-VERSION:3\n#EXTINF:4.5,\na.ts";

    assert_eq!(parse(text).unwrap().version, Some(3.0));
    assert!(validate(&lines(text)).is_empty());

    let reversed = text.replace("VERSION:2\n#EXT-X-VERSION:3", "VERSION:3\n#EXT-X-VERSION:2");
    assert_eq!(parse(&reversed).unwrap().version, Some(2.0));
    assert_eq!(validate(&lines(&reversed)).len(), 1);
}
