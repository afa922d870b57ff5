//! The mutable optimization state: the two latent-factor matrices.

use rand::distributions::Distribution;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use statrs::distribution::Normal;

use crate::math::matrix::Matrix;
use crate::prelude::*;

/// Item and user factor matrices.
///
/// `item_factors` is `n_items × K`; `user_factors` holds one `K`-sized row
/// per user. Created once, then mutated in place by the optimizer for the
/// whole run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatentFactors {
    pub(crate) item_factors: Matrix,
    pub(crate) user_factors: Matrix,
}

impl LatentFactors {
    /// Draws every entry from the standard normal distribution.
    pub fn random<R: Rng + ?Sized>(
        n_items: usize,
        n_users: usize,
        n_factors: usize,
        rng: &mut R,
    ) -> Self {
        let normal = Normal::new(0.0, 1.0).expect("unit normal parameters are valid");
        Self {
            item_factors: Matrix::from_fn(n_items, n_factors, || normal.sample(rng)),
            user_factors: Matrix::from_fn(n_users, n_factors, || normal.sample(rng)),
        }
    }

    /// Warm start from precomputed matrices, e.g. a prior run.
    pub fn from_matrices(item_factors: Matrix, user_factors: Matrix) -> Result<Self> {
        if item_factors.n_cols() != user_factors.n_cols() {
            return Err(Error::ShapeMismatch(format!(
                "item factors have {} columns, user factors have {}",
                item_factors.n_cols(),
                user_factors.n_cols(),
            )));
        }
        Ok(Self {
            item_factors,
            user_factors,
        })
    }

    #[must_use]
    pub fn n_items(&self) -> usize {
        self.item_factors.n_rows()
    }

    #[must_use]
    pub fn n_users(&self) -> usize {
        self.user_factors.n_rows()
    }

    #[must_use]
    pub fn n_factors(&self) -> usize {
        self.item_factors.n_cols()
    }

    #[must_use]
    pub fn item_factors(&self) -> &Matrix {
        &self.item_factors
    }

    #[must_use]
    pub fn user_factors(&self) -> &Matrix {
        &self.user_factors
    }

    pub(crate) fn is_finite(&self) -> bool {
        self.item_factors.is_finite() && self.user_factors.is_finite()
    }
}

/// How the optimizer obtains its initial state.
#[derive(Debug, Clone)]
pub enum Init {
    /// Fresh standard-normal matrices from the seeded generator.
    Random { seed: u64 },
    /// Precomputed matrices from a prior run.
    Warm(LatentFactors),
}

impl Init {
    pub(crate) fn into_factors(
        self,
        n_items: usize,
        n_users: usize,
        n_factors: usize,
    ) -> Result<LatentFactors> {
        match self {
            Self::Random { seed } => {
                let mut rng = StdRng::seed_from_u64(seed);
                Ok(LatentFactors::random(n_items, n_users, n_factors, &mut rng))
            }
            Self::Warm(factors) => {
                if factors.n_items() != n_items
                    || factors.n_users() != n_users
                    || factors.n_factors() != n_factors
                {
                    return Err(Error::ShapeMismatch(format!(
                        "warm-start factors are {}×{}×{}, the run needs {n_items}×{n_users}×{n_factors}",
                        factors.n_items(),
                        factors.n_users(),
                        factors.n_factors(),
                    )));
                }
                Ok(factors)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_factors_have_the_requested_shape() {
        let mut rng = StdRng::seed_from_u64(42);
        let factors = LatentFactors::random(4, 3, 2, &mut rng);
        assert_eq!(factors.n_items(), 4);
        assert_eq!(factors.n_users(), 3);
        assert_eq!(factors.n_factors(), 2);
        assert!(factors.is_finite());
    }

    #[test]
    fn same_seed_draws_the_same_factors() {
        let mut rng_1 = StdRng::seed_from_u64(7);
        let mut rng_2 = StdRng::seed_from_u64(7);
        assert_eq!(
            LatentFactors::random(3, 3, 2, &mut rng_1),
            LatentFactors::random(3, 3, 2, &mut rng_2),
        );
    }

    #[test]
    fn mismatched_factor_widths_are_rejected() {
        let result = LatentFactors::from_matrices(Matrix::zeros(2, 3), Matrix::zeros(2, 2));
        assert!(matches!(result, Err(Error::ShapeMismatch(_))));
    }

    #[test]
    fn warm_start_must_match_the_run_shape() {
        let factors =
            LatentFactors::from_matrices(Matrix::zeros(2, 2), Matrix::zeros(3, 2)).unwrap();
        let result = Init::Warm(factors).into_factors(2, 4, 2);
        assert!(matches!(result, Err(Error::ShapeMismatch(_))));
    }
}
