//! Compiled-template cache keyed by (name, language).

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::errors::Result;
use crate::links::LinkBuilder;
use crate::model::Diff;

use super::compile::{compile, CompiledTemplate};

/// Cache key: template name plus language partition
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TemplateKey {
    name: String,
    language: String,
}

impl TemplateKey {
    pub fn new(name: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            language: language.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn language(&self) -> &str {
        &self.language
    }
}

impl fmt::Display for TemplateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}&{}", self.name, self.language)
    }
}

/// Process-lifetime store of compiled templates
///
/// One lock covers lookup and insertion for every key, so a cache miss
/// serializes all callers until compilation finishes. Entries are never
/// evicted. A failed compile is not stored: the next call with the same
/// key compiles again.
#[derive(Debug, Default)]
pub struct TemplateCache {
    templates: Mutex<HashMap<TemplateKey, Arc<CompiledTemplate>>>,
    compile_count: AtomicUsize,
}

impl TemplateCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the template cached under (`name`, `language`), compiling
    /// `default_source` on a miss
    ///
    /// # Errors
    ///
    /// Returns `TemplateCompile` when `default_source` does not compile.
    pub fn get_template(
        &self,
        name: &str,
        language: &str,
        default_source: &str,
    ) -> Result<Arc<CompiledTemplate>> {
        let key = TemplateKey::new(name, language);
        let mut templates = self.lock();

        if let Some(template) = templates.get(&key) {
            return Ok(Arc::clone(template));
        }

        self.compile_count.fetch_add(1, Ordering::Relaxed);
        let rendered_key = key.to_string();
        let template = match compile(&rendered_key, default_source) {
            Ok(template) => Arc::new(template),
            Err(err) => {
                debug!(
                    template_key = rendered_key.as_str(),
                    error = %err,
                    "template compile failed; not cached"
                );
                return Err(err);
            }
        };

        debug!(template_key = rendered_key.as_str(), "template compiled");
        templates.insert(key, Arc::clone(&template));
        Ok(template)
    }

    /// Look up (or compile) a template and execute it against `diff`
    ///
    /// Execution runs after the cache lock is released.
    ///
    /// # Errors
    ///
    /// Returns `TemplateCompile` or `TemplateExecution`.
    pub fn render(
        &self,
        name: &str,
        language: &str,
        default_source: &str,
        diff: &Diff,
        links: &dyn LinkBuilder,
    ) -> Result<String> {
        let template = self.get_template(name, language, default_source)?;
        template.execute(diff, links)
    }

    /// Number of cached templates
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Number of compilations attempted, successful or not
    pub fn compile_count(&self) -> usize {
        self.compile_count.load(Ordering::Relaxed)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<TemplateKey, Arc<CompiledTemplate>>> {
        // the map is only mutated by a single insert, so a poisoned guard is still consistent
        self.templates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::NotifyError;
    use crate::links::PlainLinkBuilder;
    use crate::model::BlockType;
    use std::thread;

    const SOURCE: &str = "{{.BlockType}} changed";

    #[test]
    fn test_same_key_compiles_once() {
        let cache = TemplateCache::new();
        let a = cache.get_template("Notify", "en", SOURCE).unwrap();
        let b = cache.get_template("Notify", "en", SOURCE).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.compile_count(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_language_partitions_cache() {
        let cache = TemplateCache::new();
        cache.get_template("Notify", "en", SOURCE).unwrap();
        cache.get_template("Notify", "ko", SOURCE).unwrap();
        assert_eq!(cache.compile_count(), 2);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_first_source_wins_for_a_key() {
        let cache = TemplateCache::new();
        cache.get_template("Notify", "en", "first").unwrap();
        let t = cache.get_template("Notify", "en", "second").unwrap();
        let out = t
            .execute(&Diff::new(BlockType::Card), &PlainLinkBuilder)
            .unwrap();
        assert_eq!(out, "first");
    }

    #[test]
    fn test_failed_compile_is_retried() {
        let cache = TemplateCache::new();
        for attempt in 1..=3 {
            let err = cache.get_template("Broken", "en", "{{.Card").unwrap_err();
            assert!(matches!(err, NotifyError::TemplateCompile { .. }));
            assert_eq!(cache.compile_count(), attempt);
        }
        assert!(cache.is_empty());

        cache.get_template("Broken", "en", SOURCE).unwrap();
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_key_display() {
        assert_eq!(TemplateKey::new("AddCardNotify", "ko").to_string(), "AddCardNotify&ko");
    }

    #[test]
    fn test_concurrent_callers_share_one_compile() {
        let cache = Arc::new(TemplateCache::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    cache
                        .render(
                            "Notify",
                            "en",
                            SOURCE,
                            &Diff::new(BlockType::Card),
                            &PlainLinkBuilder,
                        )
                        .unwrap()
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), "card changed");
        }
        assert_eq!(cache.compile_count(), 1);
    }
}
