//! Extension → driver registry.
//!
//! The single source of truth for what is supported. The process-wide
//! default is built once and never mutated; callers that need more formats
//! build their own instance and `register` into it.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use crate::drivers::{
    FormatDriver, ImageDriver, JsonDriver, MessageDriver, NpyDriver, NpzDriver, TextDriver,
};
use crate::error::SaveError;
use crate::extension::normalize_token;

#[derive(Clone, Default)]
pub struct FormatRegistry {
    drivers: HashMap<String, Arc<dyn FormatDriver>>,
}

impl FormatRegistry {
    /// Registry with no formats.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in vocabulary: `.png`, `.jpg`, `.jpeg` → image, `.npy`,
    /// `.npz`, `.json`, `.txt`, `.pb`.
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        let image: Arc<dyn FormatDriver> = Arc::new(ImageDriver);
        for token in [".png", ".jpg", ".jpeg"] {
            registry.insert(token, Arc::clone(&image));
        }
        registry.insert(".npy", Arc::new(NpyDriver));
        registry.insert(".npz", Arc::new(NpzDriver));
        registry.insert(".json", Arc::new(JsonDriver));
        registry.insert(".txt", Arc::new(TextDriver));
        registry.insert(".pb", Arc::new(MessageDriver));
        registry
    }

    /// Shared default registry, built on first use.
    pub fn global() -> Arc<FormatRegistry> {
        static GLOBAL: OnceLock<Arc<FormatRegistry>> = OnceLock::new();
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(FormatRegistry::with_defaults())))
    }

    /// Add or replace the driver for `token` (normalized to lower case with a
    /// leading period). Returns the driver it replaced.
    ///
    /// Fails with `InvalidToken` for tokens extension extraction can never
    /// yield: empty ones and ones containing a period or path separator
    /// after the leading period.
    pub fn register(
        &mut self,
        token: &str,
        driver: Arc<dyn FormatDriver>,
    ) -> Result<Option<Arc<dyn FormatDriver>>, SaveError> {
        let key = normalize_token(token);
        let body = &key[1..];
        if body.is_empty() || body.contains(['.', '/', '\\']) {
            return Err(SaveError::InvalidToken {
                token: token.to_string(),
            });
        }
        Ok(self.insert(&key, driver))
    }

    fn insert(&mut self, token: &str, driver: Arc<dyn FormatDriver>) -> Option<Arc<dyn FormatDriver>> {
        self.drivers.insert(normalize_token(token), driver)
    }

    pub fn lookup(&self, token: &str) -> Option<Arc<dyn FormatDriver>> {
        self.drivers.get(&normalize_token(token)).cloned()
    }

    pub fn supports(&self, token: &str) -> bool {
        self.drivers.contains_key(&normalize_token(token))
    }

    /// (token, driver name) pairs, sorted by token.
    pub fn entries(&self) -> Vec<(String, String)> {
        let mut entries: Vec<(String, String)> = self
            .drivers
            .iter()
            .map(|(token, driver)| (token.clone(), driver.name().to_string()))
            .collect();
        entries.sort();
        entries
    }

    pub fn len(&self) -> usize {
        self.drivers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drivers.is_empty()
    }
}

impl std::fmt::Debug for FormatRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.entries()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_vocabulary() {
        let registry = FormatRegistry::with_defaults();
        let expected = [
            (".jpeg", "image"),
            (".jpg", "image"),
            (".json", "json"),
            (".npy", "npy"),
            (".npz", "npz"),
            (".pb", "pb"),
            (".png", "image"),
            (".txt", "txt"),
        ];
        let entries = registry.entries();
        assert_eq!(entries.len(), expected.len());
        for ((token, driver), (want_token, want_driver)) in entries.iter().zip(expected) {
            assert_eq!(token, want_token);
            assert_eq!(driver, want_driver);
        }
    }

    #[test]
    fn lookup_normalizes_tokens() {
        let registry = FormatRegistry::with_defaults();
        assert_eq!(registry.lookup(".PNG").unwrap().name(), "image");
        assert_eq!(registry.lookup("json").unwrap().name(), "json");
        assert!(registry.lookup(".csv").is_none());
        assert!(!registry.supports(".csv"));
    }

    #[test]
    fn register_adds_and_replaces() {
        let mut registry = FormatRegistry::empty();
        assert!(registry.is_empty());
        assert!(registry.register("LOG", Arc::new(TextDriver)).unwrap().is_none());
        assert!(registry.supports(".log"));
        let replaced = registry
            .register(".log", Arc::new(JsonDriver))
            .unwrap()
            .unwrap();
        assert_eq!(replaced.name(), "txt");
        assert_eq!(registry.lookup(".log").unwrap().name(), "json");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn register_rejects_unreachable_tokens() {
        let mut registry = FormatRegistry::empty();
        for token in ["", ".", "..", ".tar.gz", "a/b"] {
            let err = registry.register(token, Arc::new(TextDriver)).err().unwrap();
            assert!(matches!(err, SaveError::InvalidToken { .. }), "{:?}", token);
        }
        assert!(registry.is_empty());
    }

    #[test]
    fn global_is_shared() {
        let a = FormatRegistry::global();
        let b = FormatRegistry::global();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.len(), 8);
    }
}
