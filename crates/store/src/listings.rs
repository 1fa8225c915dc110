//! Listing store: documents, filtered pagination, moderation queries and the
//! marketplace aggregations.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use carlot_core::{ListingId, ReviewId, UserId};
use carlot_listings::{Listing, ListingPatch, ListingStatus, Review};

/// Exact-match filters for the public listing search.
#[derive(Debug, Clone, Default)]
pub struct ListingFilter {
    pub vehicle_model: Option<String>,
    pub location: Option<String>,
    pub car_type: Option<String>,
    pub price: Option<f64>,
    pub mileage: Option<f64>,
}

impl ListingFilter {
    fn matches(&self, listing: &Listing) -> bool {
        if let Some(v) = &self.vehicle_model {
            if &listing.vehicle_model != v {
                return false;
            }
        }
        if let Some(v) = &self.location {
            if &listing.location != v {
                return false;
            }
        }
        if let Some(v) = &self.car_type {
            if &listing.car_type != v {
                return false;
            }
        }
        if let Some(v) = self.price {
            if listing.price != v {
                return false;
            }
        }
        if let Some(v) = self.mileage {
            if listing.mileage != v {
                return false;
            }
        }
        true
    }
}

/// One page of listings plus the overall match count.
#[derive(Debug, Clone)]
pub struct PagedListings {
    pub items: Vec<Listing>,
    pub total_count: u64,
}

/// Average price per car type (active listings only).
#[derive(Debug, Clone, PartialEq)]
pub struct TypeAverage {
    pub car_type: String,
    pub average_price: f64,
}

/// Listing count per car type (active listings only).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeCount {
    pub car_type: String,
    pub count: u64,
}

/// Price aggregates over active listings; absent when none exist.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSummary {
    pub total_listings: u64,
    pub average_price: f64,
    pub max_price: f64,
    pub min_price: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListingsSummary {
    pub prices: Option<PriceSummary>,
    pub counts_by_type: Vec<TypeCount>,
}

/// Listing documents with embedded reviews.
///
/// Mutations are single atomic document writes; `false` returns mean the
/// target document (or nested review) was not there.
pub trait ListingStore: Send + Sync {
    fn insert(&self, listing: Listing);
    fn get(&self, id: ListingId) -> Option<Listing>;
    /// Bump the view counter, returning the post-increment document.
    fn increment_views(&self, id: ListingId) -> Option<Listing>;
    fn update(&self, id: ListingId, patch: ListingPatch) -> bool;
    fn set_status(&self, id: ListingId, status: ListingStatus, reported_by: Option<UserId>) -> bool;
    fn delete(&self, id: ListingId) -> bool;

    /// Filtered page in creation order, plus the total match count.
    fn find_page(&self, filter: &ListingFilter, page: u64, page_size: u64) -> PagedListings;
    /// Moderation query: listings in any of `statuses`, optionally one seller's.
    fn find_by_status(&self, statuses: &[ListingStatus], seller: Option<UserId>) -> Vec<Listing>;

    fn push_review(&self, id: ListingId, review: Review) -> bool;
    fn update_review(&self, id: ListingId, review_id: ReviewId, text: String, rating: u8) -> bool;
    fn pull_review(&self, id: ListingId, review_id: ReviewId) -> bool;

    fn average_price_by_type(&self) -> Vec<TypeAverage>;
    fn summary(&self) -> ListingsSummary;
}

impl<S> ListingStore for Arc<S>
where
    S: ListingStore + ?Sized,
{
    fn insert(&self, listing: Listing) {
        (**self).insert(listing)
    }

    fn get(&self, id: ListingId) -> Option<Listing> {
        (**self).get(id)
    }

    fn increment_views(&self, id: ListingId) -> Option<Listing> {
        (**self).increment_views(id)
    }

    fn update(&self, id: ListingId, patch: ListingPatch) -> bool {
        (**self).update(id, patch)
    }

    fn set_status(&self, id: ListingId, status: ListingStatus, reported_by: Option<UserId>) -> bool {
        (**self).set_status(id, status, reported_by)
    }

    fn delete(&self, id: ListingId) -> bool {
        (**self).delete(id)
    }

    fn find_page(&self, filter: &ListingFilter, page: u64, page_size: u64) -> PagedListings {
        (**self).find_page(filter, page, page_size)
    }

    fn find_by_status(&self, statuses: &[ListingStatus], seller: Option<UserId>) -> Vec<Listing> {
        (**self).find_by_status(statuses, seller)
    }

    fn push_review(&self, id: ListingId, review: Review) -> bool {
        (**self).push_review(id, review)
    }

    fn update_review(&self, id: ListingId, review_id: ReviewId, text: String, rating: u8) -> bool {
        (**self).update_review(id, review_id, text, rating)
    }

    fn pull_review(&self, id: ListingId, review_id: ReviewId) -> bool {
        (**self).pull_review(id, review_id)
    }

    fn average_price_by_type(&self) -> Vec<TypeAverage> {
        (**self).average_price_by_type()
    }

    fn summary(&self) -> ListingsSummary {
        (**self).summary()
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// In-memory listing store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryListingStore {
    inner: RwLock<HashMap<ListingId, Listing>>,
}

impl InMemoryListingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Active listings in creation order (IDs are time-ordered UUIDv7).
    fn active_sorted(&self) -> Vec<Listing> {
        let map = match self.inner.read() {
            Ok(m) => m,
            Err(_) => return vec![],
        };
        let mut items: Vec<Listing> = map
            .values()
            .filter(|l| l.status == ListingStatus::Active)
            .cloned()
            .collect();
        items.sort_by_key(|l| *l.id.as_uuid());
        items
    }
}

impl ListingStore for InMemoryListingStore {
    fn insert(&self, listing: Listing) {
        if let Ok(mut map) = self.inner.write() {
            map.insert(listing.id, listing);
        }
    }

    fn get(&self, id: ListingId) -> Option<Listing> {
        let map = self.inner.read().ok()?;
        map.get(&id).cloned()
    }

    fn increment_views(&self, id: ListingId) -> Option<Listing> {
        let mut map = self.inner.write().ok()?;
        let listing = map.get_mut(&id)?;
        listing.views += 1;
        Some(listing.clone())
    }

    fn update(&self, id: ListingId, patch: ListingPatch) -> bool {
        match self.inner.write() {
            Ok(mut map) => match map.get_mut(&id) {
                Some(listing) => {
                    listing.apply(patch);
                    true
                }
                None => false,
            },
            Err(_) => false,
        }
    }

    fn set_status(&self, id: ListingId, status: ListingStatus, reported_by: Option<UserId>) -> bool {
        match self.inner.write() {
            Ok(mut map) => match map.get_mut(&id) {
                Some(listing) => {
                    listing.status = status;
                    if reported_by.is_some() {
                        listing.reported_by = reported_by;
                    }
                    true
                }
                None => false,
            },
            Err(_) => false,
        }
    }

    fn delete(&self, id: ListingId) -> bool {
        match self.inner.write() {
            Ok(mut map) => map.remove(&id).is_some(),
            Err(_) => false,
        }
    }

    fn find_page(&self, filter: &ListingFilter, page: u64, page_size: u64) -> PagedListings {
        let map = match self.inner.read() {
            Ok(m) => m,
            Err(_) => {
                return PagedListings {
                    items: vec![],
                    total_count: 0,
                }
            }
        };

        let mut matched: Vec<Listing> = map
            .values()
            .filter(|l| filter.matches(l))
            .cloned()
            .collect();
        matched.sort_by_key(|l| *l.id.as_uuid());

        let total_count = matched.len() as u64;
        // Client-supplied page numbers can be anything up to u64::MAX; a
        // saturated skip just yields an empty page.
        let skip = page.saturating_sub(1).saturating_mul(page_size);
        let items = matched
            .into_iter()
            .skip(usize::try_from(skip).unwrap_or(usize::MAX))
            .take(page_size as usize)
            .collect();

        PagedListings { items, total_count }
    }

    fn find_by_status(&self, statuses: &[ListingStatus], seller: Option<UserId>) -> Vec<Listing> {
        let map = match self.inner.read() {
            Ok(m) => m,
            Err(_) => return vec![],
        };
        let mut items: Vec<Listing> = map
            .values()
            .filter(|l| statuses.contains(&l.status))
            .filter(|l| seller.map(|s| l.user_id == s).unwrap_or(true))
            .cloned()
            .collect();
        items.sort_by_key(|l| *l.id.as_uuid());
        items
    }

    fn push_review(&self, id: ListingId, review: Review) -> bool {
        match self.inner.write() {
            Ok(mut map) => match map.get_mut(&id) {
                Some(listing) => {
                    listing.reviews.push(review);
                    true
                }
                None => false,
            },
            Err(_) => false,
        }
    }

    fn update_review(&self, id: ListingId, review_id: ReviewId, text: String, rating: u8) -> bool {
        match self.inner.write() {
            Ok(mut map) => {
                let Some(listing) = map.get_mut(&id) else {
                    return false;
                };
                match listing.reviews.iter_mut().find(|r| r.id == review_id) {
                    Some(review) => {
                        review.review_text = text;
                        review.rating = rating;
                        review.created_at = chrono::Utc::now();
                        true
                    }
                    None => false,
                }
            }
            Err(_) => false,
        }
    }

    fn pull_review(&self, id: ListingId, review_id: ReviewId) -> bool {
        match self.inner.write() {
            Ok(mut map) => {
                let Some(listing) = map.get_mut(&id) else {
                    return false;
                };
                let before = listing.reviews.len();
                listing.reviews.retain(|r| r.id != review_id);
                listing.reviews.len() != before
            }
            Err(_) => false,
        }
    }

    fn average_price_by_type(&self) -> Vec<TypeAverage> {
        let mut sums: HashMap<String, (f64, u64)> = HashMap::new();
        for listing in self.active_sorted() {
            let entry = sums.entry(listing.car_type.clone()).or_insert((0.0, 0));
            entry.0 += listing.price;
            entry.1 += 1;
        }

        let mut stats: Vec<TypeAverage> = sums
            .into_iter()
            .map(|(car_type, (sum, n))| TypeAverage {
                car_type,
                average_price: round2(sum / n as f64),
            })
            .collect();
        stats.sort_by(|a, b| a.average_price.total_cmp(&b.average_price));
        stats
    }

    fn summary(&self) -> ListingsSummary {
        let active = self.active_sorted();

        let prices = if active.is_empty() {
            None
        } else {
            let total = active.len() as u64;
            let sum: f64 = active.iter().map(|l| l.price).sum();
            let max = active.iter().map(|l| l.price).fold(f64::MIN, f64::max);
            let min = active.iter().map(|l| l.price).fold(f64::MAX, f64::min);
            Some(PriceSummary {
                total_listings: total,
                average_price: round2(sum / total as f64),
                max_price: round2(max),
                min_price: round2(min),
            })
        };

        let mut counts: HashMap<String, u64> = HashMap::new();
        for listing in &active {
            *counts.entry(listing.car_type.clone()).or_insert(0) += 1;
        }
        let mut counts_by_type: Vec<TypeCount> = counts
            .into_iter()
            .map(|(car_type, count)| TypeCount { car_type, count })
            .collect();
        counts_by_type.sort_by(|a, b| b.count.cmp(&a.count).then(a.car_type.cmp(&b.car_type)));

        ListingsSummary {
            prices,
            counts_by_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carlot_listings::NewListing;

    fn listing(owner: UserId, model: &str, car_type: &str, price: f64) -> Listing {
        Listing::create(
            owner,
            NewListing {
                vehicle_model: model.to_string(),
                price,
                mileage: 50_000.0,
                location: "Leeds".to_string(),
                car_type: car_type.to_string(),
                listing_age: 1,
            },
        )
        .unwrap()
    }

    #[test]
    fn pagination_math_matches_total_count() {
        let store = InMemoryListingStore::new();
        let owner = UserId::new();
        for i in 0..25 {
            store.insert(listing(owner, &format!("Car {i}"), "suv", 1_000.0 + i as f64));
        }

        let filter = ListingFilter::default();
        let page1 = store.find_page(&filter, 1, 10);
        let page3 = store.find_page(&filter, 3, 10);
        let page4 = store.find_page(&filter, 4, 10);

        assert_eq!(page1.total_count, 25);
        assert_eq!(page1.items.len(), 10);
        assert_eq!(page3.items.len(), 5);
        assert!(page4.items.is_empty());
    }

    #[test]
    fn extreme_page_numbers_yield_an_empty_page() {
        let store = InMemoryListingStore::new();
        let owner = UserId::new();
        store.insert(listing(owner, "Golf", "hatchback", 9_000.0));

        let filter = ListingFilter::default();
        let paged = store.find_page(&filter, u64::MAX, 10);
        assert!(paged.items.is_empty());
        assert_eq!(paged.total_count, 1);

        let paged = store.find_page(&filter, 2, u64::MAX);
        assert!(paged.items.is_empty());
    }

    #[test]
    fn filters_are_exact_matches() {
        let store = InMemoryListingStore::new();
        let owner = UserId::new();
        store.insert(listing(owner, "Golf", "hatchback", 9_000.0));
        store.insert(listing(owner, "Polo", "hatchback", 7_000.0));
        store.insert(listing(owner, "X5", "suv", 30_000.0));

        let filter = ListingFilter {
            car_type: Some("hatchback".to_string()),
            ..Default::default()
        };
        assert_eq!(store.find_page(&filter, 1, 10).total_count, 2);

        let filter = ListingFilter {
            price: Some(30_000.0),
            ..Default::default()
        };
        assert_eq!(store.find_page(&filter, 1, 10).total_count, 1);
    }

    #[test]
    fn aggregations_cover_only_active_listings() {
        let store = InMemoryListingStore::new();
        let owner = UserId::new();
        let sold = listing(owner, "Golf", "hatchback", 10_000.0);
        let sold_id = sold.id;
        store.insert(sold);
        store.insert(listing(owner, "Polo", "hatchback", 6_000.0));
        store.insert(listing(owner, "X5", "suv", 30_000.0));
        store.set_status(sold_id, ListingStatus::Sold, None);

        let stats = store.average_price_by_type();
        assert_eq!(
            stats,
            vec![
                TypeAverage {
                    car_type: "hatchback".to_string(),
                    average_price: 6_000.0
                },
                TypeAverage {
                    car_type: "suv".to_string(),
                    average_price: 30_000.0
                },
            ]
        );

        let summary = store.summary();
        let prices = summary.prices.unwrap();
        assert_eq!(prices.total_listings, 2);
        assert_eq!(prices.average_price, 18_000.0);
        assert_eq!(prices.max_price, 30_000.0);
        assert_eq!(prices.min_price, 6_000.0);
    }

    #[test]
    fn summary_of_empty_store_has_no_price_block() {
        let store = InMemoryListingStore::new();
        let summary = store.summary();
        assert!(summary.prices.is_none());
        assert!(summary.counts_by_type.is_empty());
    }

    #[test]
    fn review_push_update_pull() {
        let store = InMemoryListingStore::new();
        let l = listing(UserId::new(), "Golf", "hatchback", 9_000.0);
        let lid = l.id;
        store.insert(l);

        let review = Review::new("bob", "good car", 4).unwrap();
        let rid = review.id;
        assert!(store.push_review(lid, review));

        assert!(store.update_review(lid, rid, "great car".to_string(), 5));
        let stored = store.get(lid).unwrap();
        assert_eq!(stored.reviews[0].review_text, "great car");
        assert_eq!(stored.reviews[0].rating, 5);

        assert!(store.pull_review(lid, rid));
        assert!(!store.pull_review(lid, rid));
    }

    #[test]
    fn moderation_query_filters_by_status_and_seller() {
        let store = InMemoryListingStore::new();
        let alice = UserId::new();
        let bob = UserId::new();

        let reported = listing(alice, "Golf", "hatchback", 9_000.0);
        let reported_id = reported.id;
        store.insert(reported);
        store.insert(listing(bob, "Polo", "hatchback", 7_000.0));
        store.set_status(reported_id, ListingStatus::Reported, Some(bob));

        let queue = store.find_by_status(&[ListingStatus::Reported, ListingStatus::Sold], None);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue[0].id, reported_id);
        assert_eq!(queue[0].reported_by, Some(bob));

        let none = store.find_by_status(&[ListingStatus::Reported], Some(bob));
        assert!(none.is_empty());
    }
}
