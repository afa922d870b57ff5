//! # bookrec
//!
//! `bookrec` learns a low-rank latent-factor model from sparse
//! `(user, item, rating)` observations and uses it to predict ratings and
//! recommend unrated items. Training is alternating gradient descent over the
//! two factor matrices, with per-user (or per-item) bias normalization and L2
//! regularization.
//!
//! ## Example
//!
//! ```rust
//! use bookrec::ratings::{Rating, RatingStore};
//! use bookrec::trainer::{self, Hyperparameters, Init};
//!
//! let store = RatingStore::from_ratings(vec![
//!     Rating::new(0, 0, 5.0),
//!     Rating::new(0, 1, 3.0),
//!     Rating::new(1, 0, 4.0),
//!     Rating::new(1, 1, 2.0),
//! ])
//! .unwrap();
//!
//! let hyper = Hyperparameters {
//!     n_factors: 2,
//!     n_iterations: 100,
//!     eval_every: 25,
//!     ..Hyperparameters::default()
//! };
//! let model = trainer::fit(&store, &hyper, Init::Random { seed: 42 }, |_| {}).unwrap();
//!
//! let predicted = model.predict(0, 1).unwrap();
//! assert!((0.0..=5.0).contains(&predicted));
//! ```

pub mod dataset;
pub mod error;
pub mod logging;
pub mod math;
pub mod model;
pub mod opts;
mod prelude;
pub mod ratings;
pub mod trainer;

pub use error::Error;

/// Alias for user indices.
pub type UserId = usize;
/// Alias for item indices.
pub type ItemId = usize;
