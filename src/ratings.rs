//! Rating triples and the immutable store over them.

use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// A single observed rating.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub user_id: UserId,
    pub item_id: ItemId,
    #[serde(rename = "rating")]
    pub value: f64,
}

impl Rating {
    #[must_use]
    pub const fn new(user_id: UserId, item_id: ItemId, value: f64) -> Self {
        Self {
            user_id,
            item_id,
            value,
        }
    }
}

/// Immutable, ordered collection of rating triples.
///
/// User and item ids are zero-indexed and dense: the object counts are
/// `max(id) + 1`.
#[derive(Debug, Clone)]
pub struct RatingStore {
    n_users: usize,
    n_items: usize,
    ratings: Vec<Rating>,
}

impl RatingStore {
    /// Builds a store, deriving the user and item counts from the ids.
    pub fn from_ratings(ratings: Vec<Rating>) -> Result<Self> {
        if ratings.is_empty() {
            return Err(Error::EmptyRatings);
        }
        let n_users = ratings.iter().map(|rating| rating.user_id).max().unwrap_or(0) + 1;
        let n_items = ratings.iter().map(|rating| rating.item_id).max().unwrap_or(0) + 1;
        Ok(Self {
            n_users,
            n_items,
            ratings,
        })
    }

    /// Builds a store with explicit object counts, e.g. a held-out set that
    /// must keep the shape of the full rating matrix.
    pub fn with_shape(n_users: usize, n_items: usize, ratings: Vec<Rating>) -> Result<Self> {
        if ratings.is_empty() {
            return Err(Error::EmptyRatings);
        }
        for rating in &ratings {
            if rating.user_id >= n_users {
                return Err(Error::UserOutOfRange {
                    user_id: rating.user_id,
                    n_users,
                });
            }
            if rating.item_id >= n_items {
                return Err(Error::ItemOutOfRange {
                    item_id: rating.item_id,
                    n_items,
                });
            }
        }
        Ok(Self {
            n_users,
            n_items,
            ratings,
        })
    }

    /// Same-shape construction for ratings already known to be in range.
    pub(crate) fn with_shape_unchecked(
        n_users: usize,
        n_items: usize,
        ratings: Vec<Rating>,
    ) -> Self {
        Self {
            n_users,
            n_items,
            ratings,
        }
    }

    #[must_use]
    pub fn ratings(&self) -> &[Rating] {
        &self.ratings
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    #[must_use]
    pub const fn n_users(&self) -> usize {
        self.n_users
    }

    #[must_use]
    pub const fn n_items(&self) -> usize {
        self.n_items
    }

    /// All the triples of one user.
    pub fn by_user(&self, user_id: UserId) -> impl Iterator<Item = &Rating> + '_ {
        self.ratings.iter().filter(move |rating| rating.user_id == user_id)
    }

    /// All the triples of one item.
    pub fn by_item(&self, item_id: ItemId) -> impl Iterator<Item = &Rating> + '_ {
        self.ratings.iter().filter(move |rating| rating.item_id == item_id)
    }

    #[must_use]
    pub fn items_rated_by(&self, user_id: UserId) -> Vec<ItemId> {
        self.by_user(user_id).map(|rating| rating.item_id).collect()
    }

    /// Groups `(item_id, value)` pairs by user in one pass.
    #[must_use]
    pub fn ratings_by_user(&self) -> Vec<Vec<(ItemId, f64)>> {
        let mut groups = vec![Vec::new(); self.n_users];
        for rating in &self.ratings {
            groups[rating.user_id].push((rating.item_id, rating.value));
        }
        groups
    }

    /// Groups `(user_id, value)` pairs by item in one pass.
    #[must_use]
    pub fn ratings_by_item(&self) -> Vec<Vec<(UserId, f64)>> {
        let mut groups = vec![Vec::new(); self.n_items];
        for rating in &self.ratings {
            groups[rating.item_id].push((rating.user_id, rating.value));
        }
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_are_max_id_plus_one() {
        let store = RatingStore::from_ratings(vec![
            Rating::new(0, 2, 4.0),
            Rating::new(3, 0, 1.0),
        ])
        .unwrap();
        assert_eq!(store.n_users(), 4);
        assert_eq!(store.n_items(), 3);
    }

    #[test]
    fn empty_ratings_are_rejected() {
        assert!(matches!(
            RatingStore::from_ratings(Vec::new()),
            Err(Error::EmptyRatings)
        ));
    }

    #[test]
    fn with_shape_rejects_out_of_range_ids() {
        let result = RatingStore::with_shape(2, 2, vec![Rating::new(5, 0, 3.0)]);
        assert!(matches!(result, Err(Error::UserOutOfRange { user_id: 5, n_users: 2 })));
    }

    #[test]
    fn items_rated_by_filters_one_user() {
        let store = RatingStore::from_ratings(vec![
            Rating::new(0, 0, 5.0),
            Rating::new(1, 1, 3.0),
            Rating::new(0, 2, 4.0),
        ])
        .unwrap();
        assert_eq!(store.items_rated_by(0), vec![0, 2]);
        assert_eq!(store.items_rated_by(1), vec![1]);
    }

    #[test]
    fn by_item_filters_one_item() {
        let store = RatingStore::from_ratings(vec![
            Rating::new(0, 0, 5.0),
            Rating::new(1, 1, 3.0),
            Rating::new(2, 0, 4.0),
        ])
        .unwrap();
        let users: Vec<UserId> = store.by_item(0).map(|rating| rating.user_id).collect();
        assert_eq!(users, vec![0, 2]);
    }

    #[test]
    fn grouping_covers_objects_without_ratings() {
        let store = RatingStore::with_shape(
            3,
            2,
            vec![Rating::new(0, 0, 5.0), Rating::new(2, 1, 1.0)],
        )
        .unwrap();
        let by_user = store.ratings_by_user();
        assert_eq!(by_user.len(), 3);
        assert!(by_user[1].is_empty());
        assert_eq!(by_user[2], vec![(1, 1.0)]);
    }
}
