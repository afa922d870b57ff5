//! Average-rating bias normalization.

use serde::{Deserialize, Serialize};

use crate::prelude::*;
use crate::ratings::{Rating, RatingStore};

/// Which axis the ratings are centered along.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum Axis {
    UserBased,
    ItemBased,
}

/// Per-object average ratings along one axis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Biases {
    axis: Axis,
    means: Vec<f64>,
}

impl Biases {
    pub(crate) fn new(axis: Axis, means: Vec<f64>) -> Self {
        Self { axis, means }
    }

    #[must_use]
    pub const fn axis(&self) -> Axis {
        self.axis
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.means.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.means.is_empty()
    }

    #[must_use]
    pub fn means(&self) -> &[f64] {
        &self.means
    }

    /// The bias applied to a `(user, item)` prediction: the user's mean under
    /// user-based normalization, the item's under item-based.
    #[must_use]
    pub fn bias_for(&self, user_id: UserId, item_id: ItemId) -> f64 {
        match self.axis {
            Axis::UserBased => self.means[user_id],
            Axis::ItemBased => self.means[item_id],
        }
    }
}

/// Computes the per-object biases and returns them together with a centered
/// copy of the store.
///
/// Runs exactly once before optimization; an object with no ratings gets a
/// zero bias instead of an undefined mean.
pub fn normalize(store: &RatingStore, axis: Axis) -> (Biases, RatingStore) {
    let n_objects = match axis {
        Axis::UserBased => store.n_users(),
        Axis::ItemBased => store.n_items(),
    };
    let object_id = |rating: &Rating| match axis {
        Axis::UserBased => rating.user_id,
        Axis::ItemBased => rating.item_id,
    };

    let mut sums = vec![0.0; n_objects];
    let mut counts = vec![0_usize; n_objects];
    for rating in store.ratings() {
        sums[object_id(rating)] += rating.value;
        counts[object_id(rating)] += 1;
    }

    let means: Vec<f64> = sums
        .iter()
        .zip(&counts)
        .map(|(sum, count)| {
            if *count == 0 {
                // Degenerate object: no observed ratings.
                0.0
            } else {
                sum / *count as f64
            }
        })
        .collect();

    let centered = store
        .ratings()
        .iter()
        .map(|rating| Rating {
            value: rating.value - means[object_id(rating)],
            ..*rating
        })
        .collect();
    let centered = RatingStore::with_shape_unchecked(store.n_users(), store.n_items(), centered);

    (Biases::new(axis, means), centered)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_3x3() -> RatingStore {
        RatingStore::from_ratings(vec![
            Rating::new(0, 0, 5.0),
            Rating::new(0, 1, 3.0),
            Rating::new(1, 1, 4.0),
            Rating::new(2, 2, 2.0),
        ])
        .unwrap()
    }

    #[test]
    fn bias_length_matches_the_axis() {
        let store = store_3x3();
        let (user_biases, _) = normalize(&store, Axis::UserBased);
        assert_eq!(user_biases.len(), store.n_users());
        let (item_biases, _) = normalize(&store, Axis::ItemBased);
        assert_eq!(item_biases.len(), store.n_items());
    }

    #[test]
    fn user_bias_is_the_mean_rating() {
        let (biases, centered) = normalize(&store_3x3(), Axis::UserBased);
        assert_eq!(biases.means()[0], 4.0);
        assert_eq!(biases.means()[1], 4.0);
        assert_eq!(biases.means()[2], 2.0);
        assert_eq!(centered.ratings()[0].value, 1.0);
        assert_eq!(centered.ratings()[1].value, -1.0);
    }

    #[test]
    fn object_without_ratings_gets_zero_bias() {
        let store =
            RatingStore::with_shape(3, 1, vec![Rating::new(0, 0, 4.0), Rating::new(2, 0, 2.0)])
                .unwrap();
        let (biases, _) = normalize(&store, Axis::UserBased);
        assert_eq!(biases.means()[1], 0.0);
    }

    #[test]
    fn normalization_is_idempotent() {
        let (_, centered) = normalize(&store_3x3(), Axis::UserBased);
        let (rebiases, _) = normalize(&centered, Axis::UserBased);
        for mean in rebiases.means() {
            assert!(mean.abs() < 1e-12);
        }
    }

    #[test]
    fn single_rating_bias_equals_the_rating() {
        let store = RatingStore::from_ratings(vec![Rating::new(0, 0, 5.0)]).unwrap();
        let (biases, centered) = normalize(&store, Axis::UserBased);
        assert_eq!(biases.means(), &[5.0]);
        assert_eq!(centered.ratings()[0].value, 0.0);
    }
}
