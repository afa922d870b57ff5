use std::fs::File;
use std::path::Path;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use itertools::Itertools;

use bookrec::dataset;
use bookrec::logging;
use bookrec::model::Model;
use bookrec::opts::{Command, FitOpts, Opts, PredictOpts, RecommendOpts};
use bookrec::trainer::{self, Init};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> anyhow::Result<()> {
    let opts = Opts::parse();
    logging::init()?;

    match opts.command {
        Command::Fit(opts) => fit(&opts),
        Command::Predict(opts) => predict(&opts),
        Command::Recommend(opts) => recommend(&opts),
    }
}

fn fit(opts: &FitOpts) -> anyhow::Result<()> {
    let store = dataset::read_ratings(&opts.ratings)?;
    tracing::info!(
        n_ratings = store.len(),
        n_users = store.n_users(),
        n_items = store.n_items(),
        "loaded the rating set",
    );

    let (train, test) = match opts.test_fraction {
        Some(test_fraction) => {
            let mut rng = StdRng::seed_from_u64(opts.seed);
            let (train, test) = dataset::train_test_split(&store, &mut rng, test_fraction)?;
            (train, Some(test))
        }
        None => (store, None),
    };

    let hyper = opts.hyper.to_hyperparameters();
    let start_instant = Instant::now();
    let model = trainer::fit(&train, &hyper, Init::Random { seed: opts.seed }, |progress| {
        tracing::info!(
            iteration = progress.iteration,
            loss = progress.loss,
            rmse = progress.rmse,
        );
    })?;
    tracing::info!(
        elapsed = logging::format_elapsed(start_instant).as_str(),
        train_rmse = model.rmse(&train)?,
        "finished",
    );

    if let Some(test) = test {
        tracing::info!(test_rmse = model.rmse(&test)?, "held-out evaluation");
    }

    let file = File::create(&opts.model)
        .with_context(|| format!("failed to create `{}`", opts.model.display()))?;
    serde_json::to_writer(file, &model).context("failed to serialize the model")?;
    tracing::info!(path = %opts.model.display(), "model saved");
    Ok(())
}

fn predict(opts: &PredictOpts) -> anyhow::Result<()> {
    let model = read_model(&opts.model)?;
    let predicted = model.predict(opts.user_id, opts.item_id)?;
    println!("{predicted:.3}");
    Ok(())
}

fn recommend(opts: &RecommendOpts) -> anyhow::Result<()> {
    let model = read_model(&opts.model)?;
    let store = dataset::read_ratings(&opts.ratings)?;

    let rated = store.items_rated_by(opts.user_id);
    let predictions = model.predict_unrated(opts.user_id, &rated)?;

    // The engine leaves the predictions unordered; ranking happens here.
    for (item_id, predicted) in predictions
        .into_iter()
        .sorted_unstable_by(|(_, lhs), (_, rhs)| rhs.total_cmp(lhs))
        .take(opts.top)
    {
        println!("{item_id}\t{predicted:.3}");
    }
    Ok(())
}

fn read_model(path: &Path) -> anyhow::Result<Model> {
    let file = File::open(path).with_context(|| format!("failed to open `{}`", path.display()))?;
    serde_json::from_reader(file)
        .with_context(|| format!("failed to deserialize the model from `{}`", path.display()))
}
