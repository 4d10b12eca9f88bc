//! Memoized "is at least" comparison between two version strings

use std::cmp::Ordering;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use indexmap::IndexMap;
use semver::Version;
use tracing::debug;

use crate::config::VERSION_CACHE_CAPACITY;
use crate::version::error::VersionError;
use crate::version::semver::{normalize_version, parse_version};

/// Compares version strings under semantic-version precedence.
///
/// Results are cached on the raw input pair. The cache is bounded and evicts
/// the oldest pair first. Failed parses are never cached.
pub struct VersionComparator {
    cache: Mutex<IndexMap<(String, String), bool>>,
    capacity: usize,
    parses: AtomicUsize,
}

impl VersionComparator {
    pub fn new() -> Self {
        Self::with_capacity(VERSION_CACHE_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cache: Mutex::new(IndexMap::with_capacity(capacity)),
            capacity: capacity.max(1),
            parses: AtomicUsize::new(0),
        }
    }

    /// Returns true when `candidate` is equal to or newer than `baseline`.
    ///
    /// `v1.0.0` and `1.0.0` are equal, so equality counts as "not older".
    pub fn is_at_least(&self, candidate: &str, baseline: &str) -> Result<bool, VersionError> {
        let key = (candidate.to_string(), baseline.to_string());
        if let Some(cached) = self.lock_cache().get(&key) {
            return Ok(*cached);
        }

        let candidate_version = self.parse(candidate)?;
        let baseline_version = self.parse(baseline)?;
        let result = candidate_version.cmp_precedence(&baseline_version) != Ordering::Less;

        let mut cache = self.lock_cache();
        if cache.len() >= self.capacity {
            cache.shift_remove_index(0);
        }
        cache.insert(key, result);

        Ok(result)
    }

    /// Number of version strings parsed since construction
    pub fn parse_count(&self) -> usize {
        self.parses.load(AtomicOrdering::Relaxed)
    }

    /// Number of cached comparisons
    pub fn cached_len(&self) -> usize {
        self.lock_cache().len()
    }

    fn parse(&self, raw: &str) -> Result<Version, VersionError> {
        self.parses.fetch_add(1, AtomicOrdering::Relaxed);
        parse_version(normalize_version(raw)).ok_or_else(|| {
            debug!("Unable to parse version {:?}", raw);
            VersionError::InvalidVersion(raw.to_string())
        })
    }

    fn lock_cache(&self) -> MutexGuard<'_, IndexMap<(String, String), bool>> {
        // The map holds only pure results, so a poisoned lock is still consistent.
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for VersionComparator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1.0.0", "1.0.0")]
    #[case("v1.0.0", "1.0.0")]
    #[case("1.0.0", "v1.0.0")]
    #[case("1.0", "1.0.0")]
    #[case("2.1.0-beta.1", "2.1.0-beta.1")]
    #[case("1.0.0+build.5", "1.0.0+build.9")]
    fn is_at_least_treats_equal_versions_as_not_older(
        #[case] candidate: &str,
        #[case] baseline: &str,
    ) {
        let comparator = VersionComparator::new();
        assert_eq!(comparator.is_at_least(candidate, baseline), Ok(true));
    }

    #[rstest]
    #[case("1.0.1", "1.0.0")]
    #[case("1.1.0", "1.0.9")]
    #[case("2.0.0", "1.99.99")]
    #[case("1.0.0", "1.0.0-rc.1")]
    #[case("1.0.0-rc.2", "1.0.0-rc.1")]
    fn is_at_least_orders_newer_candidates_first(#[case] newer: &str, #[case] older: &str) {
        let comparator = VersionComparator::new();
        assert_eq!(comparator.is_at_least(newer, older), Ok(true));
        assert_eq!(comparator.is_at_least(older, newer), Ok(false));
    }

    #[rstest]
    #[case("main", "1.0.0")]
    #[case("1.0.0", "latest")]
    #[case("", "1.0.0")]
    fn is_at_least_fails_for_unparseable_versions(#[case] candidate: &str, #[case] baseline: &str) {
        let comparator = VersionComparator::new();
        assert!(matches!(
            comparator.is_at_least(candidate, baseline),
            Err(VersionError::InvalidVersion(_))
        ));
    }

    #[test]
    fn is_at_least_reuses_cached_result_without_parsing() {
        let comparator = VersionComparator::new();

        assert_eq!(comparator.is_at_least("1.3.0", "v1.2.0"), Ok(true));
        assert_eq!(comparator.parse_count(), 2);

        for _ in 0..10 {
            assert_eq!(comparator.is_at_least("1.3.0", "v1.2.0"), Ok(true));
        }
        assert_eq!(comparator.parse_count(), 2);

        assert_eq!(comparator.is_at_least("v1.2.0", "1.3.0"), Ok(false));
        assert_eq!(comparator.parse_count(), 4);
    }

    #[test]
    fn is_at_least_does_not_cache_failures() {
        let comparator = VersionComparator::new();

        assert!(comparator.is_at_least("main", "1.0.0").is_err());
        assert!(comparator.is_at_least("main", "1.0.0").is_err());

        assert_eq!(comparator.cached_len(), 0);
        assert_eq!(comparator.parse_count(), 2);
    }

    #[test]
    fn cache_evicts_oldest_pair_when_full() {
        let comparator = VersionComparator::with_capacity(2);

        comparator.is_at_least("1.0.0", "1.0.0").unwrap();
        comparator.is_at_least("2.0.0", "1.0.0").unwrap();
        comparator.is_at_least("3.0.0", "1.0.0").unwrap();
        assert_eq!(comparator.cached_len(), 2);
        let parses = comparator.parse_count();

        // Most recent pair is still cached
        comparator.is_at_least("3.0.0", "1.0.0").unwrap();
        assert_eq!(comparator.parse_count(), parses);

        // Oldest pair was evicted and is parsed again
        comparator.is_at_least("1.0.0", "1.0.0").unwrap();
        assert_eq!(comparator.parse_count(), parses + 2);
    }
}
