//! Category keys - the collection names records are stored under

use std::fmt;

/// The collection/partition name under which a group of related records
/// is stored (e.g. a body area for an exercise catalog).
///
/// Keys are trimmed and stored lower-cased so that `"Chest"`, `"chest"`,
/// and `" CHEST "` all address the same collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CategoryKey(String);

impl CategoryKey {
    /// Create a new category key
    ///
    /// # Errors
    /// Returns an error if the key is empty or whitespace-only.
    pub fn new(raw: &str) -> Result<Self, String> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err("Category key cannot be empty".to_string());
        }
        Ok(Self(trimmed.to_lowercase()))
    }

    /// Get the key as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_key_lowercases() {
        let key = CategoryKey::new("Upper Body").unwrap();
        assert_eq!(key.as_str(), "upper body");
    }

    #[test]
    fn test_category_key_trims() {
        let key = CategoryKey::new("  chest \n").unwrap();
        assert_eq!(key.as_str(), "chest");
    }

    #[test]
    fn test_empty_category_key_rejected() {
        assert!(CategoryKey::new("").is_err());
        assert!(CategoryKey::new("   \t").is_err());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: any input with a non-whitespace character yields a key
        #[test]
        fn test_nonblank_input_accepted(s in "[ ]{0,3}[a-zA-Z][a-zA-Z ]{0,20}") {
            let key = CategoryKey::new(&s);
            prop_assert!(key.is_ok());
        }

        /// Property: construction is idempotent over its own output
        #[test]
        fn test_normalization_idempotent(s in "[a-zA-Z][a-zA-Z ]{0,20}") {
            let once = CategoryKey::new(&s).unwrap();
            let twice = CategoryKey::new(once.as_str()).unwrap();
            prop_assert_eq!(once, twice);
        }

        /// Property: keys never carry uppercase or surrounding whitespace
        #[test]
        fn test_key_is_normalized(s in "\\PC{1,40}") {
            if let Ok(key) = CategoryKey::new(&s) {
                prop_assert_eq!(key.as_str(), key.as_str().trim());
                prop_assert_eq!(key.as_str().to_lowercase(), key.as_str());
            }
        }
    }
}
