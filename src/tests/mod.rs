//! Scenario tests
//!
//! End-to-end tests over complete playlists:
//! - Parsing media, variant and encrypted playlists
//! - Serialization round-trips
//! - Protocol version validation

pub mod validation;
