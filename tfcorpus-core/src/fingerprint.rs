// tfcorpus-core/src/fingerprint.rs
//! Content fingerprints used as deduplication keys.
//!
//! The fingerprint is taken over a lossy normal form of the file: line and
//! block comments are removed without regard for string literals and every
//! whitespace run becomes a single space. Two files that only differ in
//! comments or layout therefore share a fingerprint.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fmt;
use std::sync::{Mutex, PoisonError};

static HASH_LINE_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)#.*$").unwrap());
static SLASH_LINE_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)//.*$").unwrap());
static BLOCK_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)/\*.*?\*/").unwrap());
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Returns the normal form of `content` that fingerprints are computed over.
pub fn normalize_for_hash(content: &str) -> String {
    let normalized = HASH_LINE_COMMENT.replace_all(content, "");
    let normalized = SLASH_LINE_COMMENT.replace_all(&normalized, "");
    let normalized = BLOCK_COMMENT.replace_all(&normalized, "");
    let normalized = WHITESPACE_RUN.replace_all(&normalized, " ");
    normalized.trim().to_string()
}

/// SHA-256 digest of normalized file content.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    pub fn of(content: &str) -> Self {
        let digest = Sha256::digest(normalize_for_hash(content).as_bytes());
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&digest);
        Self(bytes)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", &self.to_hex()[..16])
    }
}

impl Serialize for Fingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// Fingerprints seen during one run.
///
/// The set only grows. Check-and-insert happens under one lock, so callers
/// sharing the set across threads can never both accept the same content.
#[derive(Debug, Default)]
pub struct SeenFingerprints {
    inner: Mutex<HashSet<Fingerprint>>,
}

impl SeenFingerprints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `fingerprint`. Returns `false` if it had already been seen.
    pub fn insert_if_new(&self, fingerprint: Fingerprint) -> bool {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(fingerprint)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    const BASE: &str = "resource \"aws_instance\" \"web\" {\n  ami = \"x\"\n}\n";

    #[test]
    fn normalization_drops_comments_and_collapses_whitespace() {
        let input = "# header\nresource \"a\" \"b\" {   // trailing\n  /* block\n  comment */ x = 1\n}\n";
        assert_eq!(normalize_for_hash(input), "resource \"a\" \"b\" { x = 1 }");
    }

    #[test]
    fn comments_and_layout_do_not_change_fingerprint() {
        let variant = "# managed by terraform\nresource   \"aws_instance\" \"web\" {\n\n\tami = \"x\"   // pinned\n  /* nothing\n here */\n}";
        assert_eq!(Fingerprint::of(BASE), Fingerprint::of(variant));
    }

    #[test]
    fn content_changes_fingerprint() {
        let other = BASE.replace("\"x\"", "\"y\"");
        assert_ne!(Fingerprint::of(BASE), Fingerprint::of(&other));
    }

    #[test]
    fn fingerprint_is_stable_hex() {
        let fp = Fingerprint::of("");
        // SHA-256 of the empty string.
        assert_eq!(
            fp.to_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(fp.to_string().len(), 64);
    }

    #[test]
    fn insert_if_new_only_accepts_once() {
        let seen = SeenFingerprints::new();
        let fp = Fingerprint::of(BASE);
        assert!(seen.insert_if_new(fp));
        assert!(!seen.insert_if_new(fp));
        assert_eq!(seen.len(), 1);
    }

    #[test]
    fn concurrent_inserts_admit_exactly_one() {
        let seen = Arc::new(SeenFingerprints::new());
        let fp = Fingerprint::of(BASE);
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let seen = Arc::clone(&seen);
                thread::spawn(move || seen.insert_if_new(fp))
            })
            .collect();
        let admitted = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|&won| won)
            .count();
        assert_eq!(admitted, 1);
    }
}
