//! Category-key resolution for source files
//!
//! Source files are heterogeneous in authoring convention, so the resolver
//! cascades through heuristics instead of trusting any single one: an
//! explicit `category` field (unquoted key, then quoted key), the export
//! identifier with its conventional suffix stripped, and finally the file's
//! base name. Earlier matches always win.

use crate::error::IngestError;
use flexion_domain::CategoryKey;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

/// Suffix the scraper appends to export identifiers (`chestExercises`)
const EXPORT_SUFFIX: &str = "Exercises";

static UNQUOTED_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)(?:^|[{,])\s*category\s*:\s*["'`]([^"'`]+)["'`]"#)
        .expect("hardcoded regex compiles")
});

static QUOTED_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"["']category["']\s*:\s*["'`]([^"'`]+)["'`]"#).expect("hardcoded regex compiles")
});

static EXPORT_IDENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"export\s+(?:const|let|var)\s+([A-Za-z_$][A-Za-z0-9_$]*)")
        .expect("hardcoded regex compiles")
});

/// Resolve the category key for a source file
///
/// # Errors
/// Fails only when every heuristic yields an empty key.
pub fn resolve_category(text: &str, path: &Path) -> Result<CategoryKey, IngestError> {
    let candidate = field_unquoted(text)
        .or_else(|| field_quoted(text))
        .or_else(|| export_ident(text))
        .or_else(|| file_stem(path));

    match candidate.as_deref().map(CategoryKey::new) {
        Some(Ok(key)) => {
            debug!("Resolved category '{}' for {}", key, path.display());
            Ok(key)
        }
        _ => Err(IngestError::MetadataResolution {
            path: path.to_path_buf(),
        }),
    }
}

fn field_unquoted(text: &str) -> Option<String> {
    UNQUOTED_FIELD
        .captures(text)
        .map(|caps| caps[1].to_string())
        .filter(|s| !s.trim().is_empty())
}

fn field_quoted(text: &str) -> Option<String> {
    QUOTED_FIELD
        .captures(text)
        .map(|caps| caps[1].to_string())
        .filter(|s| !s.trim().is_empty())
}

fn export_ident(text: &str) -> Option<String> {
    let ident = EXPORT_IDENT.captures(text).map(|caps| caps[1].to_string())?;
    let prefix = ident.strip_suffix(EXPORT_SUFFIX)?;
    if prefix.is_empty() {
        return None;
    }
    Some(prefix.to_string())
}

fn file_stem(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
        .filter(|s| !s.trim().is_empty())
}
