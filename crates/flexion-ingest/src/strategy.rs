//! The record extraction cascade
//!
//! A fixed, ordered list of independent strategies, each attempting a full
//! extraction of the source text. The first strategy that yields at least
//! one record is accepted as final and later strategies are never invoked,
//! even if they might have found more - determinism over completeness, and
//! no merging of inconsistent partial results. Zero records from every
//! strategy is the cascade's failure signal.

use crate::jsonify::jsonify;
use crate::literal;
use flexion_domain::RawRecord;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::{debug, info, warn};

/// One independent attempt at turning raw text into records
pub trait ExtractionStrategy {
    /// Short name used in log lines
    fn name(&self) -> &'static str;

    /// Attempt a full extraction; an empty result means the strategy failed
    fn attempt(&self, text: &str) -> Vec<RawRecord>;
}

/// The ordered strategy cascade
pub struct Cascade {
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl Cascade {
    /// Build a cascade from an explicit strategy order
    pub fn new(strategies: Vec<Box<dyn ExtractionStrategy>>) -> Self {
        Self { strategies }
    }

    /// Run the cascade: first strategy with at least one record wins
    pub fn extract(&self, text: &str) -> Vec<RawRecord> {
        for strategy in &self.strategies {
            let records = strategy.attempt(text);
            if !records.is_empty() {
                info!(
                    "Strategy '{}' extracted {} records",
                    strategy.name(),
                    records.len()
                );
                return records;
            }
            debug!("Strategy '{}' yielded no records", strategy.name());
        }
        Vec::new()
    }
}

impl Default for Cascade {
    /// The production order: strict scan, relaxed scan, whole-collection parse
    fn default() -> Self {
        Self::new(vec![
            Box::new(StrictBlockScan),
            Box::new(RelaxedBlockScan),
            Box::new(CollectionParse),
        ])
    }
}

static STRICT_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\s*id\s*:").expect("hardcoded regex compiles"));

static RELAXED_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\{\s*["']?id["']?\s*:"#).expect("hardcoded regex compiles"));

static COLLECTION_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"=\s*\[").expect("hardcoded regex compiles"));

/// Strict structural scan: record blocks must open with an unquoted `id`
/// as their first key.
pub struct StrictBlockScan;

impl ExtractionStrategy for StrictBlockScan {
    fn name(&self) -> &'static str {
        "strict-block-scan"
    }

    fn attempt(&self, text: &str) -> Vec<RawRecord> {
        scan_blocks(text, &STRICT_MARKER)
    }
}

/// Relaxed structural scan: tolerates quoting and spacing variants around
/// the `id` key, for files that drift further from the convention.
pub struct RelaxedBlockScan;

impl ExtractionStrategy for RelaxedBlockScan {
    fn name(&self) -> &'static str {
        "relaxed-block-scan"
    }

    fn attempt(&self, text: &str) -> Vec<RawRecord> {
        scan_blocks(text, &RELAXED_MARKER)
    }
}

/// Whole-collection parse: normalize and parse the entire list-valued field
/// in one go, falling back to sandboxed literal evaluation of the same text.
pub struct CollectionParse;

impl ExtractionStrategy for CollectionParse {
    fn name(&self) -> &'static str {
        "collection-parse"
    }

    fn attempt(&self, text: &str) -> Vec<RawRecord> {
        let Some(collection) = locate_collection(text) else {
            return Vec::new();
        };

        match serde_json::from_str::<Value>(&jsonify(collection)) {
            Ok(Value::Array(items)) => return objects_of(items),
            Ok(_) => debug!("Collection did not normalize to a list"),
            Err(e) => debug!("Strict parse of the whole collection failed: {}", e),
        }

        match literal::parse(collection) {
            Ok(Value::Array(items)) => objects_of(items),
            Ok(_) => {
                warn!("Collection evaluated to a non-list literal");
                Vec::new()
            }
            Err(e) => {
                warn!("Literal evaluation of the collection failed: {}", e);
                Vec::new()
            }
        }
    }
}

/// Scan for record blocks anchored at `marker`, strict-parsing each block
/// independently. A block that fails to parse is skipped, not fatal.
fn scan_blocks(text: &str, marker: &Regex) -> Vec<RawRecord> {
    let bytes = text.as_bytes();
    let mut records = Vec::new();
    let mut cursor = 0;

    for m in marker.find_iter(text) {
        if m.start() < cursor {
            // inside a block we already consumed
            continue;
        }
        let open = m.start();
        let Some(end) = balanced_end(bytes, open, b'{', b'}') else {
            warn!("Unterminated record block at offset {}", open);
            continue;
        };
        cursor = end;

        match serde_json::from_str::<Value>(&jsonify(&text[open..end])) {
            Ok(Value::Object(map)) => records.push(map),
            Ok(_) => warn!("Record block at offset {} is not an object", open),
            Err(e) => warn!("Skipping malformed record block at offset {}: {}", open, e),
        }
    }

    records
}

/// Locate the list-valued field holding the whole collection
fn locate_collection(text: &str) -> Option<&str> {
    let m = COLLECTION_START.find(text)?;
    let open = m.end() - 1;
    let end = balanced_end(text.as_bytes(), open, b'[', b']')?;
    Some(&text[open..end])
}

/// End index (exclusive) of the balanced bracket pair opening at `open`,
/// skipping string literals and comments.
fn balanced_end(bytes: &[u8], open: usize, open_b: u8, close_b: u8) -> Option<usize> {
    let mut depth = 0usize;
    let mut i = open;

    while i < bytes.len() {
        let b = bytes[i];
        if b == open_b {
            depth += 1;
        } else if b == close_b {
            depth -= 1;
            if depth == 0 {
                return Some(i + 1);
            }
        } else if matches!(b, b'"' | b'\'' | b'`') {
            i = skip_string(bytes, i);
            continue;
        } else if b == b'/' && bytes.get(i + 1) == Some(&b'/') {
            while i < bytes.len() && bytes[i] != b'\n' {
                i += 1;
            }
            continue;
        } else if b == b'/' && bytes.get(i + 1) == Some(&b'*') {
            i += 2;
            while i < bytes.len() && !(bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/')) {
                i += 1;
            }
            i = (i + 2).min(bytes.len());
            continue;
        }
        i += 1;
    }

    None
}

/// Index just past the closing quote of the string starting at `start`
fn skip_string(bytes: &[u8], start: usize) -> usize {
    let quote = bytes[start];
    let mut i = start + 1;
    while i < bytes.len() {
        if bytes[i] == b'\\' {
            i += 2;
        } else if bytes[i] == quote {
            return i + 1;
        } else {
            i += 1;
        }
    }
    i
}

fn objects_of(items: Vec<Value>) -> Vec<RawRecord> {
    items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(map) => Some(map),
            other => {
                debug!("Skipping non-object collection entry: {}", other);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const WELL_FORMED: &str = r#"
export const chestExercises = [
  {
    id: 'bench-press',
    name: 'Bench Press',
    muscleGroups: ['pectorals', 'triceps'],
    reps: 10,
  },
  {
    id: 'push-up',
    name: 'Push Up',
    alternatives: ['bench-press'],
  },
];
"#;

    #[test]
    fn test_strict_scan_extracts_all_blocks() {
        let records = StrictBlockScan.attempt(WELL_FORMED);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["id"], "bench-press");
        assert_eq!(records[1]["id"], "push-up");
    }

    #[test]
    fn test_strict_scan_skips_malformed_block() {
        let text = r#"
const records = [
  { id: 'good-one', name: 'Good One' },
  { id: 'broken', name: },
  { id: 'good-two', name: 'Good Two' },
];
"#;
        let records = StrictBlockScan.attempt(text);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["id"], "good-one");
        assert_eq!(records[1]["id"], "good-two");
    }

    #[test]
    fn test_strict_scan_ignores_quoted_id_key() {
        let text = r#"[{ "id": "a", "name": "A" }]"#;
        assert!(StrictBlockScan.attempt(text).is_empty());
    }

    #[test]
    fn test_relaxed_scan_accepts_quoted_id_key() {
        let text = r#"[{ "id": "a", "name": "A" }, {'id' : 'b'}]"#;
        let records = RelaxedBlockScan.attempt(text);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["id"], "a");
        assert_eq!(records[1]["id"], "b");
    }

    #[test]
    fn test_nested_braces_stay_inside_block() {
        let text = "[{ id: 'a', name: 'A', extra: { depth: 2 } }]";
        let records = StrictBlockScan.attempt(text);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["extra"]["depth"], 2);
    }

    #[test]
    fn test_braces_inside_strings_ignored() {
        let text = "[{ id: 'a', note: 'keep } balanced' }, { id: 'b', name: 'B' }]";
        let records = StrictBlockScan.attempt(text);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["note"], "keep } balanced");
    }

    #[test]
    fn test_collection_parse_reads_whole_array() {
        let records = CollectionParse.attempt(WELL_FORMED);
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_collection_parse_falls_back_to_literal_eval() {
        // the identifier reference defeats the strict JSON parse
        let text = "export const x = [{ id: 'a', name: 'A', alternatives: [other] }];";
        let records = CollectionParse.attempt(text);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["alternatives"][0], "other");
    }

    #[test]
    fn test_collection_parse_without_array_yields_nothing() {
        assert!(CollectionParse.attempt("export const n = 3;").is_empty());
    }

    #[test]
    fn test_default_cascade_prefers_strict_scan() {
        let records = Cascade::default().extract(WELL_FORMED);
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_cascade_falls_through_to_relaxed() {
        let text = r#"export const x = [{ "id": "a", "name": "A" }];"#;
        let records = Cascade::default().extract(text);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["id"], "a");
    }

    #[test]
    fn test_cascade_total_failure_is_empty() {
        assert!(Cascade::default().extract("not a catalog at all").is_empty());
    }

    struct Counting {
        yields: usize,
        calls: Arc<AtomicUsize>,
    }

    impl ExtractionStrategy for Counting {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn attempt(&self, _text: &str) -> Vec<RawRecord> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (0..self.yields)
                .map(|i| {
                    let mut map = RawRecord::new();
                    map.insert("id".to_string(), serde_json::json!(format!("r{}", i)));
                    map
                })
                .collect()
        }
    }

    #[test]
    fn test_cascade_short_circuits_after_first_success() {
        let first_calls = Arc::new(AtomicUsize::new(0));
        let second_calls = Arc::new(AtomicUsize::new(0));
        let cascade = Cascade::new(vec![
            Box::new(Counting {
                yields: 1,
                calls: Arc::clone(&first_calls),
            }),
            Box::new(Counting {
                yields: 5,
                calls: Arc::clone(&second_calls),
            }),
        ]);

        let records = cascade.extract("anything");

        // one record beats five: the first success is final
        assert_eq!(records.len(), 1);
        assert_eq!(first_calls.load(Ordering::SeqCst), 1);
        assert_eq!(second_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_cascade_tries_later_strategies_on_empty() {
        let calls = Arc::new(AtomicUsize::new(0));
        let cascade = Cascade::new(vec![
            Box::new(Counting {
                yields: 0,
                calls: Arc::new(AtomicUsize::new(0)),
            }),
            Box::new(Counting {
                yields: 2,
                calls: Arc::clone(&calls),
            }),
        ]);

        assert_eq!(cascade.extract("anything").len(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
