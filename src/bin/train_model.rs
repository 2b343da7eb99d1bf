//! Offline training job: fetch multi-year history for one ticker, fit the
//! normalizer over the whole corpus, train the dense regressor on sliding
//! windows, report out-of-sample metrics, and persist both artifacts.
//!
//! Failures here are fatal; this is a one-shot supervised job with no
//! recovery path.

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime};
use clap::Parser;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use stockcast::application::ml::dense_net::DenseNet;
use stockcast::application::ml::predictor::SequenceModel;
use stockcast::application::training::{SEQUENCE_LENGTH, build_dataset, evaluate};
use stockcast::domain::ports::MarketDataService;
use stockcast::domain::scaling::MinMaxNormalizer;
use stockcast::infrastructure::yahoo::{DEFAULT_BASE_URL, YahooMarketDataService};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Ticker symbol to train on
    #[arg(long, default_value = "AAPL")]
    symbol: String,

    /// Start of the historical corpus (YYYY-MM-DD)
    #[arg(long, default_value = "2015-01-01")]
    start: NaiveDate,

    /// End of the historical corpus (YYYY-MM-DD)
    #[arg(long, default_value = "2024-01-01")]
    end: NaiveDate,

    /// Hidden layer width
    #[arg(long, default_value_t = 50)]
    hidden: usize,

    /// Training epochs
    #[arg(long, default_value_t = 20)]
    epochs: usize,

    /// Mini-batch size
    #[arg(long, default_value_t = 32)]
    batch_size: usize,

    /// SGD learning rate
    #[arg(long, default_value_t = 0.05)]
    learning_rate: f64,

    /// Disable the chronological train/test split (train on 100% of data)
    #[arg(long)]
    no_split: bool,

    /// Path to output model artifact
    #[arg(long, default_value = "data/model/stock_dense_model.json")]
    output: PathBuf,

    /// Path to output normalization state
    #[arg(long, default_value = "data/model/scaler.json")]
    scaler_output: PathBuf,

    /// Market data endpoint override
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let start = args.start.and_time(NaiveTime::MIN).and_utc();
    let end = args.end.and_time(NaiveTime::MIN).and_utc();

    println!(
        "Fetching {} daily closes, {} to {}...",
        args.symbol, args.start, args.end
    );
    let market_data = YahooMarketDataService::new(args.base_url.clone());
    let series = market_data.daily_closes(&args.symbol, start, end).await?;
    if series.is_empty() {
        anyhow::bail!("no data found for {}", args.symbol);
    }

    let closes = series.closes();
    println!("Fetched {} daily closes.", closes.len());

    let normalizer =
        MinMaxNormalizer::fit(&closes).context("cannot fit normalizer on an empty corpus")?;
    let scaled = normalizer.transform(&closes);

    let (inputs, targets) = build_dataset(&scaled, SEQUENCE_LENGTH);
    if inputs.is_empty() {
        anyhow::bail!(
            "corpus too short for windowing: {} closes, need more than {}",
            closes.len(),
            SEQUENCE_LENGTH
        );
    }

    let train_len = if args.no_split {
        inputs.len()
    } else {
        (inputs.len() as f64 * 0.8).floor() as usize
    };
    let (x_train, y_train) = (&inputs[..train_len], &targets[..train_len]);
    let (x_test, y_test) = (&inputs[train_len..], &targets[train_len..]);

    println!(
        "Training dense regressor (window {}, hidden {}, epochs {}, batch {}, lr {}) on {} examples...",
        SEQUENCE_LENGTH, args.hidden, args.epochs, args.batch_size, args.learning_rate, train_len
    );

    let mut model = DenseNet::new(SEQUENCE_LENGTH, args.hidden);
    for epoch in 1..=args.epochs {
        let loss = model.train_epoch(x_train, y_train, args.batch_size, args.learning_rate);
        println!("Epoch {:>2}/{}: train MSE {:.6}", epoch, args.epochs, loss);
    }

    if !x_test.is_empty() {
        let report = evaluate(&model, x_test, y_test);
        println!(
            "OOS Test (n={}): RMSE={:.6}, MAE={:.6}, R²={:.4}",
            x_test.len(),
            report.rmse,
            report.mae,
            report.r2
        );
    }

    model.save(&args.output)?;
    println!("Model saved to {:?}", args.output);

    save_normalizer(&normalizer, &args.scaler_output)?;
    println!("Normalization state saved to {:?}", args.scaler_output);

    verify_artifacts(&args.output, &args.scaler_output, &closes)?;

    println!("Done.");
    Ok(())
}

fn save_normalizer(normalizer: &MinMaxNormalizer, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating artifact directory {:?}", parent))?;
    }
    let file =
        File::create(path).with_context(|| format!("creating normalization state {:?}", path))?;
    serde_json::to_writer(BufWriter::new(file), normalizer)
        .with_context(|| format!("serializing normalization state {:?}", path))?;
    Ok(())
}

/// Reload both persisted artifacts and run one prediction against the tail
/// of the corpus. These files are only ever read back here; the serving path
/// refits its normalizer per request.
fn verify_artifacts(model_path: &Path, scaler_path: &Path, closes: &[f64]) -> Result<()> {
    let model = DenseNet::load(model_path)?;

    let file = File::open(scaler_path)
        .with_context(|| format!("opening normalization state {:?}", scaler_path))?;
    let scaler: MinMaxNormalizer = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("deserializing normalization state {:?}", scaler_path))?;

    let scaled = scaler.transform(closes);
    let window = &scaled[scaled.len() - SEQUENCE_LENGTH..];
    let next = model.predict_next(window)?;

    println!(
        "Verification: next-day close estimate {:.2} (last observed close {:.2})",
        scaler.inverse_one(next),
        closes[closes.len() - 1]
    );
    Ok(())
}
