//! Training loss and RMSE evaluation.

use serde::{Deserialize, Serialize};

use crate::math;
use crate::model;
use crate::ratings::RatingStore;
use crate::trainer::bias::Biases;
use crate::trainer::factors::LatentFactors;

/// Flavor of the regularization penalty in the reported loss.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum RegularizationKind {
    /// Unsquared norm sum: `0.5·λ·(‖X‖F + ‖W‖F)`.
    Frobenius,
    /// Conventional L2 penalty: `0.5·λ·(‖X‖F² + ‖W‖F²)`.
    SquaredFrobenius,
}

/// Accumulates squared residuals.
#[derive(Default)]
pub struct SquaredError {
    sum: f64,
    count: usize,
}

impl SquaredError {
    pub fn push(&mut self, residual: f64) {
        self.sum += residual * residual;
        self.count += 1;
    }

    #[must_use]
    pub fn mean(&self) -> f64 {
        self.sum / self.count.max(1) as f64
    }

    #[must_use]
    pub fn rmse(&self) -> f64 {
        self.mean().sqrt()
    }
}

/// Average halved squared reconstruction error over the centered store, plus
/// the regularization penalty.
///
/// The reconstruction here is the raw factor product: no bias, no clamping.
#[must_use]
pub fn regularized_loss(
    centered: &RatingStore,
    factors: &LatentFactors,
    regularization: f64,
    kind: RegularizationKind,
) -> f64 {
    let mut errors = SquaredError::default();
    for rating in centered.ratings() {
        let reconstructed = math::dot(
            factors.item_factors().row(rating.item_id),
            factors.user_factors().row(rating.user_id),
        );
        errors.push(rating.value - reconstructed);
    }

    let item_norm = math::norm(factors.item_factors().values());
    let user_norm = math::norm(factors.user_factors().values());
    let penalty = match kind {
        RegularizationKind::Frobenius => item_norm + user_norm,
        RegularizationKind::SquaredFrobenius => item_norm * item_norm + user_norm * user_norm,
    };

    0.5 * errors.mean() + 0.5 * regularization * penalty
}

/// Root-mean-squared error of the clamped, bias-adjusted predictions over any
/// rating set, train or held-out.
#[must_use]
pub fn rmse(
    store: &RatingStore,
    factors: &LatentFactors,
    biases: &Biases,
    min_rating: f64,
    max_rating: f64,
) -> f64 {
    let mut errors = SquaredError::default();
    for rating in store.ratings() {
        let predicted = model::clamped_prediction(
            factors,
            biases,
            min_rating,
            max_rating,
            rating.user_id,
            rating.item_id,
        );
        errors.push(predicted - rating.value);
    }
    errors.rmse()
}
