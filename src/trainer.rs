//! Alternating gradient descent for matrix factorization.
//!
//! Each iteration refines the item factors against the frozen user factors,
//! then the user factors against the just-updated item factors. Within a
//! half-step every row update is independent, so rows are refined on a
//! parallel iterator; the half-step boundary is the barrier.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::math;
use crate::math::matrix::Matrix;
use crate::model::Model;
use crate::prelude::*;
use crate::ratings::RatingStore;

pub mod bias;
pub mod factors;
pub mod loss;
pub mod progress;

pub use bias::{normalize, Axis, Biases};
pub use factors::{Init, LatentFactors};
pub use loss::RegularizationKind;
pub use progress::TrainingProgress;

/// Immutable training configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hyperparameters {
    /// Latent dimensionality `K`.
    pub n_factors: usize,
    /// L2 regularization weight `λ`.
    pub regularization: f64,
    /// Gradient-descent step size `η`.
    pub learning_rate: f64,
    /// Total iteration count; there is no early exit.
    pub n_iterations: usize,
    /// Diagnostic cadence, in iterations.
    pub eval_every: usize,
    /// Normalization axis for the rating biases.
    pub axis: Axis,
    /// Penalty flavor in the reported loss.
    pub regularization_kind: RegularizationKind,
    /// Lower bound of the rating scale.
    pub min_rating: f64,
    /// Upper bound of the rating scale.
    pub max_rating: f64,
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Self {
            n_factors: 8,
            regularization: 0.1,
            learning_rate: 0.5,
            n_iterations: 1000,
            eval_every: 100,
            axis: Axis::UserBased,
            regularization_kind: RegularizationKind::Frobenius,
            min_rating: 0.0,
            max_rating: 5.0,
        }
    }
}

impl Hyperparameters {
    /// Rejects a malformed configuration before any computation starts.
    pub fn validate(&self) -> Result {
        if self.n_factors < 1 {
            return Err(Error::InvalidHyperparameters(
                "the latent dimensionality must be at least 1".to_string(),
            ));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(Error::InvalidHyperparameters(format!(
                "the learning rate must be positive and finite, got {}",
                self.learning_rate,
            )));
        }
        if !(self.regularization >= 0.0 && self.regularization.is_finite()) {
            return Err(Error::InvalidHyperparameters(format!(
                "the regularization weight must be non-negative and finite, got {}",
                self.regularization,
            )));
        }
        if self.eval_every < 1 {
            return Err(Error::InvalidHyperparameters(
                "the evaluation cadence must be at least 1".to_string(),
            ));
        }
        if !(self.min_rating < self.max_rating
            && self.min_rating.is_finite()
            && self.max_rating.is_finite())
        {
            return Err(Error::InvalidHyperparameters(format!(
                "the rating bounds [{}, {}] are not a non-empty finite range",
                self.min_rating, self.max_rating,
            )));
        }
        Ok(())
    }
}

/// Trains a model on the given rating set.
///
/// The observer receives a [`TrainingProgress`] record every
/// [`Hyperparameters::eval_every`] iterations; the engine itself performs no
/// I/O.
#[instrument(skip_all, fields(n_ratings = store.len(), n_iterations = hyper.n_iterations))]
pub fn fit(
    store: &RatingStore,
    hyper: &Hyperparameters,
    init: Init,
    mut on_progress: impl FnMut(&TrainingProgress),
) -> Result<Model> {
    hyper.validate()?;

    let (biases, centered) = bias::normalize(store, hyper.axis);
    let by_item = centered.ratings_by_item();
    let by_user = centered.ratings_by_user();
    let n_ratings = centered.len() as f64;

    let mut factors = init.into_factors(store.n_items(), store.n_users(), hyper.n_factors)?;

    for iteration in 1..=hyper.n_iterations {
        refine_half_step(
            &mut factors.item_factors,
            &factors.user_factors,
            &by_item,
            n_ratings,
            hyper,
        );
        refine_half_step(
            &mut factors.user_factors,
            &factors.item_factors,
            &by_user,
            n_ratings,
            hyper,
        );

        if !factors.is_finite() {
            return Err(Error::Diverged { iteration });
        }

        if iteration % hyper.eval_every == 0 {
            let progress = TrainingProgress {
                iteration,
                loss: loss::regularized_loss(
                    &centered,
                    &factors,
                    hyper.regularization,
                    hyper.regularization_kind,
                ),
                rmse: loss::rmse(store, &factors, &biases, hyper.min_rating, hyper.max_rating),
            };
            tracing::debug!(
                iteration = progress.iteration,
                loss = progress.loss,
                rmse = progress.rmse,
            );
            on_progress(&progress);
        }
    }

    Ok(Model::new(factors, biases, hyper.min_rating, hyper.max_rating))
}

/// Refines every row of `refined` against the frozen other-side matrix.
///
/// `groups[row]` lists, for each observation of that row's object, the frozen
/// side's row index and the centered rating. Rows write disjoint slices and
/// only read `frozen`, so the parallel loop needs no synchronization. The
/// residual term is averaged over the total rating count, not the per-object
/// count.
fn refine_half_step(
    refined: &mut Matrix,
    frozen: &Matrix,
    groups: &[Vec<(usize, f64)>],
    n_ratings: f64,
    hyper: &Hyperparameters,
) {
    refined.par_rows_mut().enumerate().for_each(|(row_id, row)| {
        let mut gradient = vec![0.0; row.len()];
        for &(frozen_id, value) in &groups[row_id] {
            let frozen_row = frozen.row(frozen_id);
            let residual = value - math::dot(row, frozen_row);
            for (slot, frozen_value) in gradient.iter_mut().zip(frozen_row) {
                *slot -= residual * frozen_value;
            }
        }
        for (value, slot) in row.iter_mut().zip(&gradient) {
            *value -= hyper.learning_rate * (slot / n_ratings + hyper.regularization * *value);
        }
    });
}
