use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use serde_json::Value;

use crate::domain::entities::page::ListPage;
use crate::domain::entities::query_key::QueryKey;
use crate::domain::entities::resource::Resource;

pub const MAX_CACHED_PAGES: usize = 64;
pub const PAGE_TTL: Duration = Duration::from_secs(60);

/// Proof that a fetch was started, stamped with the resource generation at
/// that moment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    key: QueryKey,
    generation: u64,
}

impl FetchTicket {
    pub fn key(&self) -> &QueryKey {
        &self.key
    }
}

#[derive(Debug, Clone)]
struct CachedPage {
    page: ListPage<Value>,
    stored_at: Instant,
    seq: u64,
}

/// Pages shared by every list view, keyed by resource and serialized filter state.
///
/// At most `capacity` pages are kept (oldest stored goes first) and a page
/// older than `ttl` counts as missing, so the next view of it refetches.
#[derive(Debug, Clone)]
pub struct ListCache {
    pages: HashMap<QueryKey, CachedPage>,
    generations: HashMap<Resource, u64>,
    in_flight: HashSet<QueryKey>,
    capacity: usize,
    ttl: Duration,
    next_seq: u64,
}

impl Default for ListCache {
    fn default() -> Self {
        Self::with_limits(MAX_CACHED_PAGES, PAGE_TTL)
    }
}

impl ListCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(capacity: usize, ttl: Duration) -> Self {
        Self {
            pages: HashMap::new(),
            generations: HashMap::new(),
            in_flight: HashSet::new(),
            capacity: capacity.max(1),
            ttl,
            next_seq: 0,
        }
    }

    pub fn get(&self, key: &QueryKey) -> Option<&ListPage<Value>> {
        self.pages
            .get(key)
            .filter(|cached| !self.is_expired(cached, Instant::now()))
            .map(|cached| &cached.page)
    }

    fn is_expired(&self, cached: &CachedPage, now: Instant) -> bool {
        now.saturating_duration_since(cached.stored_at) >= self.ttl
    }

    fn generation(&self, resource: Resource) -> u64 {
        self.generations.get(&resource).copied().unwrap_or(0)
    }

    /// Starts a fetch for `key` unless a fresh page is cached or one is already loading.
    pub fn begin(&mut self, key: &QueryKey) -> Option<FetchTicket> {
        let now = Instant::now();
        if let Some(cached) = self.pages.get(key) {
            if !self.is_expired(cached, now) {
                return None;
            }
            self.pages.remove(key);
        }
        if !self.in_flight.insert(key.clone()) {
            return None;
        }
        Some(FetchTicket {
            key: key.clone(),
            generation: self.generation(key.resource()),
        })
    }

    /// Keeps the page unless the resource was invalidated after the fetch began.
    pub fn store(&mut self, ticket: FetchTicket, page: ListPage<Value>) -> bool {
        if ticket.generation != self.generation(ticket.key.resource()) {
            return false;
        }
        self.in_flight.remove(&ticket.key);
        self.next_seq += 1;
        self.pages.insert(
            ticket.key,
            CachedPage {
                page,
                stored_at: Instant::now(),
                seq: self.next_seq,
            },
        );
        self.evict_overflow();
        true
    }

    fn evict_overflow(&mut self) {
        while self.pages.len() > self.capacity {
            let Some(oldest) = self
                .pages
                .iter()
                .min_by_key(|(_, cached)| cached.seq)
                .map(|(key, _)| key.clone())
            else {
                break;
            };
            self.pages.remove(&oldest);
        }
    }

    pub fn fail(&mut self, ticket: &FetchTicket) {
        if ticket.generation == self.generation(ticket.key.resource()) {
            self.in_flight.remove(&ticket.key);
        }
    }

    /// Drops every cached page of `resource`; every view of it refetches.
    pub fn invalidate(&mut self, resource: Resource) {
        *self.generations.entry(resource).or_insert(0) += 1;
        self.pages.retain(|key, _| key.resource() != resource);
        self.in_flight.retain(|key| key.resource() != resource);
    }
}

/// The key a list view is currently showing. Results for any other key are stale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveQuery {
    current: Option<QueryKey>,
}

impl ActiveQuery {
    pub fn point_to(&mut self, key: QueryKey) {
        self.current = Some(key);
    }

    pub fn is_current(&self, key: &QueryKey) -> bool {
        self.current.as_ref() == Some(key)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::entities::filter::FilterState;
    use crate::domain::entities::query_key::build_key;

    fn page_of(count: usize) -> ListPage<Value> {
        ListPage {
            rows: (0..count).map(|i| json!({"id": i})).collect(),
            total: Some(count as u64),
            total_amount: None,
            page: 1,
            items_per_page: 10,
        }
    }

    #[test]
    fn begin_skips_cached_and_loading_keys() {
        let mut cache = ListCache::new();
        let key = build_key(Resource::Entries, &FilterState::default());

        let ticket = cache.begin(&key).expect("first fetch should start");
        assert!(cache.begin(&key).is_none());
        assert!(cache.store(ticket, page_of(2)));

        assert!(cache.begin(&key).is_none());
        assert_eq!(cache.get(&key).map(|p| p.rows.len()), Some(2));
    }

    #[test]
    fn invalidation_rejects_older_results() {
        let mut cache = ListCache::new();
        let key = build_key(Resource::Categories, &FilterState::default());

        let old = cache.begin(&key).expect("fetch should start");
        cache.invalidate(Resource::Categories);

        let fresh = cache.begin(&key).expect("refetch should start after invalidation");
        assert!(!cache.store(old, page_of(1)));
        assert!(cache.get(&key).is_none());
        assert!(cache.begin(&key).is_none(), "fresh fetch is still loading");

        assert!(cache.store(fresh, page_of(3)));
        assert_eq!(cache.get(&key).map(|p| p.rows.len()), Some(3));
    }

    #[test]
    fn invalidation_is_scoped_to_resource() {
        let mut cache = ListCache::new();
        let entries = build_key(Resource::Entries, &FilterState::default());
        let costs = build_key(Resource::CostCenters, &FilterState::default());

        for key in [&entries, &costs] {
            let ticket = cache.begin(key).expect("fetch should start");
            cache.store(ticket, page_of(1));
        }
        cache.invalidate(Resource::Entries);

        assert!(cache.get(&entries).is_none());
        assert!(cache.get(&costs).is_some());
    }

    #[test]
    fn failed_fetch_can_be_retried_by_the_view() {
        let mut cache = ListCache::new();
        let key = build_key(Resource::PaymentTypes, &FilterState::default());

        let ticket = cache.begin(&key).expect("fetch should start");
        cache.fail(&ticket);

        assert!(cache.begin(&key).is_some());
    }

    #[test]
    fn oldest_page_is_evicted_past_capacity() {
        let mut cache = ListCache::with_limits(2, PAGE_TTL);
        let keys: Vec<_> = (1..=3)
            .map(|page| build_key(Resource::Entries, &FilterState::default().with_page(page)))
            .collect();

        for key in &keys {
            let ticket = cache.begin(key).expect("fetch should start");
            assert!(cache.store(ticket, page_of(1)));
        }

        assert!(cache.get(&keys[0]).is_none());
        assert!(cache.get(&keys[1]).is_some());
        assert!(cache.get(&keys[2]).is_some());
        assert!(cache.begin(&keys[0]).is_some(), "evicted page should refetch");
    }

    #[test]
    fn expired_page_is_refetched() {
        let mut cache = ListCache::with_limits(MAX_CACHED_PAGES, Duration::ZERO);
        let key = build_key(Resource::Categories, &FilterState::default());

        let ticket = cache.begin(&key).expect("fetch should start");
        assert!(cache.store(ticket, page_of(2)));

        assert!(cache.get(&key).is_none());
        let again = cache.begin(&key).expect("expired page should refetch");
        assert!(cache.begin(&key).is_none(), "refetch is already loading");
        assert!(cache.store(again, page_of(4)));
    }

    #[test]
    fn fresh_page_within_ttl_is_reused() {
        let mut cache = ListCache::with_limits(MAX_CACHED_PAGES, Duration::from_secs(3600));
        let key = build_key(Resource::CostCenters, &FilterState::default());

        let ticket = cache.begin(&key).expect("fetch should start");
        cache.store(ticket, page_of(1));

        assert!(cache.begin(&key).is_none());
        assert_eq!(cache.get(&key).map(|p| p.rows.len()), Some(1));
    }

    #[test]
    fn active_query_tracks_latest_key() {
        let first = build_key(Resource::Entries, &FilterState::default());
        let second = build_key(Resource::Entries, &FilterState::default().with_page(2));
        let mut active = ActiveQuery::default();

        active.point_to(first.clone());
        active.point_to(second.clone());

        assert!(!active.is_current(&first));
        assert!(active.is_current(&second));
    }
}
