//! Public voting reference generation.

use rand::{Rng, distributions::Alphanumeric};

/// Length of the random suffix appended to every reference.
const SUFFIX_LEN: usize = 8;

/// Generator for opaque voting references.
///
/// A reference has the shape `{namespace}_{id}_{suffix}` where the
/// namespace is the entity's kind slug (or `round`), the id is the
/// numeric storage id, and the suffix is a random alphanumeric tail
/// that keeps references unguessable. The whole string is lowercased.
#[derive(Debug, Clone, Default)]
pub struct ReferenceGenerator {
    _private: (),
}

impl ReferenceGenerator {
    /// Create a new reference generator.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }

    /// Generate a reference for the given namespace and numeric id.
    #[must_use]
    pub fn generate(&self, namespace: &str, id: i64) -> String {
        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(SUFFIX_LEN)
            .map(char::from)
            .collect();

        format!("{namespace}_{id}_{suffix}").to_lowercase()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_shape() {
        let generator = ReferenceGenerator::new();
        let reference = generator.generate("business", 42);

        let parts: Vec<&str> = reference.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "business");
        assert_eq!(parts[1], "42");
        assert_eq!(parts[2].len(), SUFFIX_LEN);
        assert!(parts[2].chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_generate_is_lowercase() {
        let generator = ReferenceGenerator::new();
        let reference = generator.generate("Round", 7);

        assert_eq!(reference, reference.to_lowercase());
        assert!(reference.starts_with("round_7_"));
    }

    #[test]
    fn test_generate_distinct_suffixes() {
        let generator = ReferenceGenerator::new();
        let first = generator.generate("person", 1);
        let second = generator.generate("person", 1);

        // Same namespace and id, but the random tail keeps them apart.
        assert_ne!(first, second);
    }
}
