//! Rating-set ingestion and splitting for the CLI host.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::Context;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::ratings::{Rating, RatingStore};

/// Reads `user_id,item_id,rating` records (with a header row) from a CSV
/// file.
pub fn read_ratings(path: &Path) -> anyhow::Result<RatingStore> {
    let file =
        File::open(path).with_context(|| format!("failed to open `{}`", path.display()))?;
    read_ratings_from(file)
        .with_context(|| format!("failed to read the ratings from `{}`", path.display()))
}

/// Reads the same CSV format from any reader.
pub fn read_ratings_from(reader: impl Read) -> anyhow::Result<RatingStore> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut ratings = Vec::new();
    for record in csv_reader.deserialize() {
        let rating: Rating = record.context("malformed rating record")?;
        ratings.push(rating);
    }
    Ok(RatingStore::from_ratings(ratings)?)
}

/// Randomly splits off a test fraction. Both sides keep the shape of the full
/// store, so a model trained on one side can be evaluated on the other.
pub fn train_test_split<R: Rng + ?Sized>(
    store: &RatingStore,
    rng: &mut R,
    test_fraction: f64,
) -> crate::prelude::Result<(RatingStore, RatingStore)> {
    let mut ratings = store.ratings().to_vec();
    ratings.shuffle(rng);

    let test_len = (test_fraction * ratings.len() as f64) as usize;
    let train = ratings.split_off(test_len);

    Ok((
        RatingStore::with_shape(store.n_users(), store.n_items(), train)?,
        RatingStore::with_shape(store.n_users(), store.n_items(), ratings)?,
    ))
}
