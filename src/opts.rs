//! CLI options.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::trainer::bias::Axis;
use crate::trainer::loss::RegularizationKind;
use crate::trainer::Hyperparameters;
use crate::{ItemId, UserId};

#[derive(Parser)]
#[command(version, about)]
pub struct Opts {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    Fit(FitOpts),
    Predict(PredictOpts),
    Recommend(RecommendOpts),
}

/// Trains a model on a CSV rating set
#[derive(Args)]
pub struct FitOpts {
    /// Input CSV with `user_id,item_id,rating` records
    #[arg(short, long)]
    pub ratings: PathBuf,

    /// Where to store the trained model
    #[arg(short, long)]
    pub model: PathBuf,

    /// RNG seed for the factor initialization
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Fraction of the ratings held out for evaluation
    #[arg(long, value_parser = parse_fraction)]
    pub test_fraction: Option<f64>,

    #[command(flatten)]
    pub hyper: HyperOpts,
}

/// Matrix-factorization hyperparameters.
#[derive(Args)]
pub struct HyperOpts {
    /// Latent factor count
    #[arg(long = "factors", default_value_t = 8)]
    pub n_factors: usize,

    /// Regularization weight
    #[arg(long, default_value_t = 0.1)]
    pub regularization: f64,

    /// Gradient-descent learning rate
    #[arg(long = "lr", default_value_t = 0.5)]
    pub learning_rate: f64,

    /// Training iteration count
    #[arg(long = "iterations", default_value_t = 1000)]
    pub n_iterations: usize,

    /// Evaluation cadence, in iterations
    #[arg(long, default_value_t = 100)]
    pub eval_every: usize,

    /// Normalization axis
    #[arg(long, value_enum, default_value = "user-based")]
    pub axis: Axis,

    /// Penalty flavor in the reported loss
    #[arg(long, value_enum, default_value = "frobenius")]
    pub regularization_kind: RegularizationKind,

    /// Lower rating bound
    #[arg(long, default_value_t = 0.0)]
    pub min_rating: f64,

    /// Upper rating bound
    #[arg(long, default_value_t = 5.0)]
    pub max_rating: f64,
}

impl HyperOpts {
    #[must_use]
    pub fn to_hyperparameters(&self) -> Hyperparameters {
        Hyperparameters {
            n_factors: self.n_factors,
            regularization: self.regularization,
            learning_rate: self.learning_rate,
            n_iterations: self.n_iterations,
            eval_every: self.eval_every,
            axis: self.axis,
            regularization_kind: self.regularization_kind,
            min_rating: self.min_rating,
            max_rating: self.max_rating,
        }
    }
}

/// Predicts a single rating
#[derive(Args)]
pub struct PredictOpts {
    /// Trained model path
    #[arg(short, long)]
    pub model: PathBuf,

    #[arg(short, long)]
    pub user_id: UserId,

    #[arg(short, long)]
    pub item_id: ItemId,
}

/// Ranks the items a user has not rated yet
#[derive(Args)]
pub struct RecommendOpts {
    /// Trained model path
    #[arg(short, long)]
    pub model: PathBuf,

    /// CSV rating set, used to exclude the user's already-rated items
    #[arg(short, long)]
    pub ratings: PathBuf,

    #[arg(short, long)]
    pub user_id: UserId,

    /// Number of recommendations to print
    #[arg(long, default_value_t = 10)]
    pub top: usize,
}

fn parse_fraction(value: &str) -> Result<f64, String> {
    let fraction: f64 = value.parse().map_err(|_| "expected a number".to_string())?;
    if fraction > 0.0 && fraction < 1.0 {
        Ok(fraction)
    } else {
        Err(format!("{fraction} is not a fraction in (0, 1)"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_options_are_parsed() {
        let opts = Opts::try_parse_from([
            "bookrec",
            "fit",
            "--ratings",
            "ratings.csv",
            "--model",
            "model.json",
            "--factors",
            "4",
            "--lr",
            "0.3",
            "--axis",
            "item-based",
        ])
        .unwrap();
        let Command::Fit(fit) = opts.command else {
            panic!("expected the fit subcommand");
        };
        let hyper = fit.hyper.to_hyperparameters();
        assert_eq!(hyper.n_factors, 4);
        assert_eq!(hyper.learning_rate, 0.3);
        assert_eq!(hyper.axis, Axis::ItemBased);
        assert_eq!(hyper.n_iterations, 1000);
    }

    #[test]
    fn out_of_range_test_fraction_is_rejected() {
        let result = Opts::try_parse_from([
            "bookrec",
            "fit",
            "--ratings",
            "ratings.csv",
            "--model",
            "model.json",
            "--test-fraction",
            "1.5",
        ]);
        assert!(result.is_err());
    }
}
