//! Trained model and the prediction surface.

use serde::{Deserialize, Serialize};

use crate::math;
use crate::prelude::*;
use crate::ratings::RatingStore;
use crate::trainer::bias::Biases;
use crate::trainer::factors::LatentFactors;
use crate::trainer::loss;

/// A trained collaborative-filtering model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Model {
    factors: LatentFactors,
    biases: Biases,
    min_rating: f64,
    max_rating: f64,
}

impl Model {
    pub(crate) fn new(
        factors: LatentFactors,
        biases: Biases,
        min_rating: f64,
        max_rating: f64,
    ) -> Self {
        Self {
            factors,
            biases,
            min_rating,
            max_rating,
        }
    }

    #[must_use]
    pub fn n_users(&self) -> usize {
        self.factors.n_users()
    }

    #[must_use]
    pub fn n_items(&self) -> usize {
        self.factors.n_items()
    }

    #[must_use]
    pub fn factors(&self) -> &LatentFactors {
        &self.factors
    }

    #[must_use]
    pub fn biases(&self) -> &Biases {
        &self.biases
    }

    /// Predicted rating of `item_id` by `user_id`, always clamped into the
    /// rating bounds.
    pub fn predict(&self, user_id: UserId, item_id: ItemId) -> Result<f64> {
        self.validate_user(user_id)?;
        self.validate_item(item_id)?;
        Ok(clamped_prediction(
            &self.factors,
            &self.biases,
            self.min_rating,
            self.max_rating,
            user_id,
            item_id,
        ))
    }

    /// Predictions for every item absent from `rated_item_ids`.
    ///
    /// The result is in item-id order; ranking it is the caller's concern.
    pub fn predict_unrated(
        &self,
        user_id: UserId,
        rated_item_ids: &[ItemId],
    ) -> Result<Vec<(ItemId, f64)>> {
        self.validate_user(user_id)?;
        let rated: AHashSet<ItemId> = rated_item_ids.iter().copied().collect();
        Ok((0..self.n_items())
            .filter(|item_id| !rated.contains(item_id))
            .map(|item_id| {
                let predicted = clamped_prediction(
                    &self.factors,
                    &self.biases,
                    self.min_rating,
                    self.max_rating,
                    user_id,
                    item_id,
                );
                (item_id, predicted)
            })
            .collect())
    }

    /// RMSE of the model's predictions over any rating set, train or
    /// held-out. The set must fit within the model's shape.
    pub fn rmse(&self, store: &RatingStore) -> Result<f64> {
        if store.n_users() > self.n_users() || store.n_items() > self.n_items() {
            return Err(Error::ShapeMismatch(format!(
                "the store is {}×{}, the model covers {}×{}",
                store.n_users(),
                store.n_items(),
                self.n_users(),
                self.n_items(),
            )));
        }
        Ok(loss::rmse(
            store,
            &self.factors,
            &self.biases,
            self.min_rating,
            self.max_rating,
        ))
    }

    fn validate_user(&self, user_id: UserId) -> Result {
        if user_id >= self.n_users() {
            return Err(Error::UserOutOfRange {
                user_id,
                n_users: self.n_users(),
            });
        }
        Ok(())
    }

    fn validate_item(&self, item_id: ItemId) -> Result {
        if item_id >= self.n_items() {
            return Err(Error::ItemOutOfRange {
                item_id,
                n_items: self.n_items(),
            });
        }
        Ok(())
    }
}

/// Bias plus the factor product, clamped into the rating bounds. The ids must
/// already be validated.
pub(crate) fn clamped_prediction(
    factors: &LatentFactors,
    biases: &Biases,
    min_rating: f64,
    max_rating: f64,
    user_id: UserId,
    item_id: ItemId,
) -> f64 {
    let predicted = biases.bias_for(user_id, item_id)
        + math::dot(
            factors.item_factors().row(item_id),
            factors.user_factors().row(user_id),
        );
    predicted.clamp(min_rating, max_rating)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ratings::Rating;
    use crate::trainer::{self, Hyperparameters, Init};

    fn trained_model() -> (RatingStore, Model) {
        let store = RatingStore::from_ratings(vec![
            Rating::new(0, 0, 5.0),
            Rating::new(0, 1, 3.0),
            Rating::new(1, 0, 4.0),
            Rating::new(1, 2, 2.0),
            Rating::new(2, 1, 1.0),
        ])
        .unwrap();
        let hyper = Hyperparameters {
            n_factors: 2,
            n_iterations: 50,
            eval_every: 25,
            ..Hyperparameters::default()
        };
        let model = trainer::fit(&store, &hyper, Init::Random { seed: 42 }, |_| {}).unwrap();
        (store, model)
    }

    #[test]
    fn every_prediction_is_within_the_rating_bounds() {
        let (store, model) = trained_model();
        for user_id in 0..store.n_users() {
            for item_id in 0..store.n_items() {
                let predicted = model.predict(user_id, item_id).unwrap();
                assert!(
                    (0.0..=5.0).contains(&predicted),
                    "prediction {predicted} for ({user_id}, {item_id}) is out of bounds",
                );
            }
        }
    }

    #[test]
    fn out_of_range_ids_fail_explicitly() {
        let (_, model) = trained_model();
        assert!(matches!(
            model.predict(100, 0),
            Err(Error::UserOutOfRange { user_id: 100, .. }),
        ));
        assert!(matches!(
            model.predict(0, 100),
            Err(Error::ItemOutOfRange { item_id: 100, .. }),
        ));
        assert!(matches!(
            model.predict_unrated(100, &[]),
            Err(Error::UserOutOfRange { .. }),
        ));
    }

    #[test]
    fn unrated_predictions_never_include_rated_items() {
        let (store, model) = trained_model();
        for user_id in 0..store.n_users() {
            let rated = store.items_rated_by(user_id);
            let predictions = model.predict_unrated(user_id, &rated).unwrap();
            for (item_id, _) in &predictions {
                assert!(!rated.contains(item_id));
            }
            assert_eq!(predictions.len(), store.n_items() - rated.len());
        }
    }

    #[test]
    fn rmse_rejects_a_store_larger_than_the_model() {
        let (_, model) = trained_model();
        let wider = RatingStore::from_ratings(vec![Rating::new(10, 0, 3.0)]).unwrap();
        assert!(matches!(model.rmse(&wider), Err(Error::ShapeMismatch(_))));
    }

    #[test]
    fn model_round_trips_through_json() {
        let (_, model) = trained_model();
        let serialized = serde_json::to_string(&model).unwrap();
        let deserialized: Model = serde_json::from_str(&serialized).unwrap();
        assert_eq!(model.factors(), deserialized.factors());
        assert_eq!(
            model.predict(0, 1).unwrap(),
            deserialized.predict(0, 1).unwrap(),
        );
    }
}
