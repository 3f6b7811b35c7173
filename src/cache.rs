use std::collections::BTreeSet;
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::{Error, GlyphId};

/// A shared, immutable set of code points.
pub(crate) type CodepointSet = Arc<BTreeSet<u32>>;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub(crate) enum CacheKey {
    CharacterSet,
    CodepointsForGlyph(GlyphId),
}

/// Memoized enumeration results.
///
/// Results are computed under the lock, so a set is either absent or complete.
/// Errors are never stored.
#[derive(Default)]
pub(crate) struct ResultCache {
    sets: Mutex<FxHashMap<CacheKey, CodepointSet>>,
}

impl ResultCache {
    pub fn get_or_try_insert_with<F>(&self, key: CacheKey, f: F) -> Result<CodepointSet, Error>
    where
        F: FnOnce() -> Result<BTreeSet<u32>, Error>,
    {
        let mut sets = self.sets.lock();
        if let Some(set) = sets.get(&key) {
            return Ok(Arc::clone(set));
        }

        let set = Arc::new(f()?);
        sets.insert(key, Arc::clone(&set));
        Ok(set)
    }

    pub fn len(&self) -> usize {
        self.sets.lock().len()
    }
}

impl std::fmt::Debug for ResultCache {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "ResultCache {{ len: {} }}", self.len())
    }
}
