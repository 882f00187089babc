//! Key matching with glob support.

use crate::navigator::kind::SPLAT;
use regex::Regex;
use std::cell::RefCell;
use std::collections::HashMap;

/// The YAML merge key. Entries under it are reached through alias search,
/// never by matching the key itself.
pub const MERGE_KEY: &str = "<<";

/// Compiled globs kept per matcher; later patterns are compiled on each use.
const CACHE_LIMIT: usize = 32;

/// Matches path segments against mapping keys, caching compiled globs.
#[derive(Debug, Default)]
pub struct KeyMatcher {
    cache: RefCell<HashMap<String, Regex>>,
}

impl KeyMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Does `pattern` select the key `key`?
    ///
    /// `*` selects every key, a pattern containing `*` is a glob, and any
    /// other pattern must equal the key exactly.
    pub fn matches(&self, pattern: &str, key: &str) -> bool {
        if key == MERGE_KEY {
            return false;
        }
        if pattern == SPLAT || pattern == key {
            return true;
        }
        if !pattern.contains('*') {
            return false;
        }
        match self.get_or_compile(pattern) {
            Some(regex) => regex.is_match(key),
            None => false,
        }
    }

    fn get_or_compile(&self, pattern: &str) -> Option<Regex> {
        if let Some(regex) = self.cache.borrow().get(pattern) {
            return Some(regex.clone());
        }

        let source = format!(
            "^{}$",
            pattern
                .split('*')
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(".*")
        );
        match Regex::new(&source) {
            Ok(regex) => {
                log::trace!("compiled glob {} as {}", pattern, source);
                let mut cache = self.cache.borrow_mut();
                if cache.len() < CACHE_LIMIT {
                    cache.insert(pattern.to_string(), regex.clone());
                }
                Some(regex)
            }
            Err(err) => {
                log::warn!("cannot compile glob {}: {}", pattern, err);
                None
            }
        }
    }
}
