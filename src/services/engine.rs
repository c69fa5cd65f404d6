// src/services/engine.rs

//! Concurrent ingestion and deduplication engine.
//!
//! Articles are identified by both `uuid` and `title`. The first article to
//! claim a key is valid until another article arrives with the same key;
//! at that point both are dropped, the key is barred for the rest of the
//! run, and every index contribution of the earlier article is retracted.
//!
//! Each `ingest` call runs under the stripe locks of every identity key it
//! touches, so the outcome is the same as some sequential order of calls.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::{DashMap, DashSet};

use crate::models::{Article, Vocabulary};
use crate::services::indexes::{DerivedIndexes, IndexSnapshot};
use crate::services::locks::{IdentityKey, KeyLocks, StripeGuard};

/// What happened to an article handed to [`IngestEngine::ingest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Admission {
    /// The article is now valid and indexed.
    Accepted,
    /// Its uuid or title was already barred. Counted once.
    Rejected,
    /// Another article held the uuid. Both counted.
    UuidConflict,
    /// Another article held the title. Both counted.
    TitleConflict,
}

enum Step {
    Done(Admission),
    Widen(IdentityKey),
}

/// Shared dedup state, mutated concurrently by workers.
pub struct IngestEngine {
    vocabulary: Arc<Vocabulary>,
    locks: KeyLocks,
    by_uuid: DashMap<String, Arc<Article>>,
    by_title: DashMap<String, Arc<Article>>,
    invalid_uuids: DashSet<String>,
    invalid_titles: DashSet<String>,
    duplicates: AtomicU64,
    indexes: DerivedIndexes,
}

impl IngestEngine {
    /// Create an engine with `lock_stripes` identity lock stripes.
    pub fn new(vocabulary: Arc<Vocabulary>, lock_stripes: usize) -> Self {
        Self {
            vocabulary,
            locks: KeyLocks::new(lock_stripes),
            by_uuid: DashMap::new(),
            by_title: DashMap::new(),
            invalid_uuids: DashSet::new(),
            invalid_titles: DashSet::new(),
            duplicates: AtomicU64::new(0),
            indexes: DerivedIndexes::new(),
        }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Number of duplicates counted so far.
    pub fn duplicates(&self) -> u64 {
        self.duplicates.load(Ordering::Relaxed)
    }

    /// Number of currently valid articles.
    pub fn valid_count(&self) -> usize {
        self.by_uuid.len()
    }

    /// Ingest one article.
    pub fn ingest(&self, article: Article) -> Admission {
        let article = Arc::new(article);
        let mut keys = vec![
            IdentityKey::Uuid(article.uuid.clone()),
            IdentityKey::Title(article.title.clone()),
        ];

        loop {
            let guard = self.locks.lock(&keys);
            match self.ingest_locked(&article, &guard) {
                Step::Done(admission) => return admission,
                Step::Widen(key) => {
                    drop(guard);
                    log::debug!("Widening identity locks for {} with {:?}", article.uuid, key);
                    keys.push(key);
                }
            }
        }
    }

    fn ingest_locked(&self, article: &Arc<Article>, guard: &StripeGuard<'_>) -> Step {
        if self.invalid_uuids.contains(&article.uuid)
            || self.invalid_titles.contains(&article.title)
        {
            self.duplicates.fetch_add(1, Ordering::Relaxed);
            return Step::Done(Admission::Rejected);
        }

        let prev_by_uuid = self.by_uuid.get(&article.uuid).map(|e| Arc::clone(e.value()));
        if let Some(prev) = prev_by_uuid {
            let needed = IdentityKey::Title(prev.title.clone());
            if !guard.covers(&self.locks, &needed) {
                return Step::Widen(needed);
            }
            self.invalid_uuids.insert(article.uuid.clone());
            self.retract(&prev);
            self.duplicates.fetch_add(2, Ordering::Relaxed);
            return Step::Done(Admission::UuidConflict);
        }

        let prev_by_title = self.by_title.get(&article.title).map(|e| Arc::clone(e.value()));
        if let Some(prev) = prev_by_title {
            let needed = IdentityKey::Uuid(prev.uuid.clone());
            if !guard.covers(&self.locks, &needed) {
                return Step::Widen(needed);
            }
            self.invalid_titles.insert(article.title.clone());
            self.invalid_uuids.insert(article.uuid.clone());
            self.retract(&prev);
            self.duplicates.fetch_add(2, Ordering::Relaxed);
            return Step::Done(Admission::TitleConflict);
        }

        self.by_uuid.insert(article.uuid.clone(), Arc::clone(article));
        self.by_title.insert(article.title.clone(), Arc::clone(article));
        self.indexes.record(article, &self.vocabulary);
        Step::Done(Admission::Accepted)
    }

    /// Undo every effect of a previously valid article and bar its keys.
    ///
    /// Caller holds the stripes of `prev.uuid` and `prev.title`.
    fn retract(&self, prev: &Arc<Article>) {
        self.invalid_uuids.insert(prev.uuid.clone());
        self.invalid_titles.insert(prev.title.clone());

        let removed = self
            .by_uuid
            .remove_if(&prev.uuid, |_, held| Arc::ptr_eq(held, prev))
            .is_some();
        self.by_title
            .remove_if(&prev.title, |_, held| Arc::ptr_eq(held, prev));

        if removed {
            self.indexes.erase(prev, &self.vocabulary);
        }
        log::debug!("Retracted article {} ({})", prev.uuid, prev.title);
    }

    /// Consume the engine once every worker has finished.
    pub fn freeze(self) -> FrozenState {
        FrozenState {
            articles: self.by_uuid.into_iter().collect(),
            invalid_uuids: self.invalid_uuids.into_iter().collect(),
            invalid_titles: self.invalid_titles.into_iter().collect(),
            duplicates: self.duplicates.into_inner(),
            indexes: self.indexes.into_parts(),
            vocabulary: self.vocabulary,
        }
    }
}

/// Settled engine state read by the report generator.
#[derive(Debug, Clone)]
pub struct FrozenState {
    /// Valid articles keyed by uuid
    pub articles: HashMap<String, Arc<Article>>,
    pub invalid_uuids: HashSet<String>,
    pub invalid_titles: HashSet<String>,
    pub duplicates: u64,
    pub indexes: IndexSnapshot,
    pub vocabulary: Arc<Vocabulary>,
}
