//! Command-line interface: the five pipeline phases as subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressIterator, ProgressStyle};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::classify::{Classifier, ClassificationReport};
use crate::config::TrialConfig;
use crate::dataset;
use crate::error::Result;
use crate::graph::extension::extend_model;
use crate::graph::ingest::{ingest_edges, ingest_nodes};
use crate::graph::store::ConceptStore;
use crate::graph::traversal::build_model;
use crate::model::snapshot;

#[derive(Parser)]
#[command(
    name = "tailgraph",
    version,
    about = "Knowledge-graph word-association classifier"
)]
pub struct Cli {
    /// Optional YAML config; defaults are used when absent.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load node and edge CSV dumps into a concept snapshot database.
    Ingest {
        /// SQLite snapshot path (created if absent).
        #[arg(long)]
        db: String,
        #[arg(long)]
        nodes: PathBuf,
        #[arg(long)]
        edges: PathBuf,
    },

    /// Shuffle a labeled dataset into k train/test folds.
    Split {
        /// Input dataset CSV (doc_id,category,keywords).
        #[arg(long)]
        input: PathBuf,
        #[arg(long, default_value_t = 5)]
        folds: usize,
        /// Directory receiving train_<i>.csv / test_<i>.csv.
        #[arg(long)]
        out_dir: PathBuf,
        /// Shuffle seed; random when absent.
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Build the per-category model from a training CSV.
    Build {
        #[arg(long)]
        db: String,
        #[arg(long)]
        train: PathBuf,
        /// Model snapshot output (JSON).
        #[arg(long)]
        model_out: PathBuf,
        /// Optional miss-log output (JSON).
        #[arg(long)]
        miss_log: Option<PathBuf>,
    },

    /// Run the adaptive extension pass over a built model.
    Extend {
        #[arg(long)]
        db: String,
        #[arg(long)]
        model: PathBuf,
        #[arg(long)]
        model_out: PathBuf,
    },

    /// Classify a test CSV against a model and print the report.
    Classify {
        #[arg(long)]
        model: PathBuf,
        #[arg(long)]
        test: PathBuf,
    },
}

fn progress_bar(len: u64, message: &'static str) -> ProgressBar {
    let bar = ProgressBar::new(len);
    bar.set_style(
        ProgressStyle::with_template("{msg} [{bar:40}] {pos}/{len}")
            .expect("static template")
            .progress_chars("=> "),
    );
    bar.set_message(message);
    bar
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => TrialConfig::from_yaml_file(path)?,
        None => TrialConfig::default(),
    };

    match cli.command {
        Command::Ingest { db, nodes, edges } => {
            let store = ConceptStore::open(&db)?;
            let node_count = ingest_nodes(&store, &nodes)?;
            let edge_count = ingest_edges(&store, &edges)?;
            let (total_nodes, total_edges) = store.counts()?;
            tracing::info!(
                node_count,
                edge_count,
                total_nodes,
                total_edges,
                "snapshot ingested"
            );
        }

        Command::Split {
            input,
            folds,
            out_dir,
            seed,
        } => {
            let rows = dataset::read_rows(&input)?;
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let splits = dataset::k_fold_splits(rows, folds, &mut rng)?;
            std::fs::create_dir_all(&out_dir)?;
            for (i, fold) in splits.iter().enumerate() {
                dataset::write_rows(&out_dir.join(format!("train_{i}.csv")), &fold.train)?;
                dataset::write_rows(&out_dir.join(format!("test_{i}.csv")), &fold.test)?;
                tracing::info!(
                    fold = i,
                    train = fold.train.len(),
                    test = fold.test.len(),
                    "fold written"
                );
            }
        }

        Command::Build {
            db,
            train,
            model_out,
            miss_log,
        } => {
            let store = ConceptStore::open(&db)?;
            let rows = dataset::read_rows(&train)?;
            let bar = progress_bar(rows.len() as u64, "building");
            let (model, misses) =
                build_model(&store, config.min_edge_weight, config.tail_length, rows.iter().progress_with(bar))?;
            snapshot::save(&model_out, &model)?;
            tracing::info!(
                documents = rows.len(),
                misses = misses.len(),
                model = %model_out.display(),
                "model built"
            );
            if let Some(path) = miss_log {
                let writer = std::io::BufWriter::new(std::fs::File::create(path)?);
                serde_json::to_writer_pretty(writer, &misses)?;
            }
        }

        Command::Extend {
            db,
            model,
            model_out,
        } => {
            let store = ConceptStore::open(&db)?;
            let frozen = snapshot::load(&model)?;
            let extended = extend_model(&store, &config, &frozen)?;
            snapshot::save(&model_out, &extended)?;
            tracing::info!(model = %model_out.display(), "extended model written");
        }

        Command::Classify { model, test } => {
            let model = snapshot::load(&model)?;
            let classifier = Classifier::from_model(&model, &config)?;
            let rows = dataset::read_rows(&test)?;
            let pairs: Vec<_> = rows
                .iter()
                .map(|row| {
                    let tokens: Vec<&str> = row.tokens().collect();
                    (row.category, classifier.classify(tokens).category)
                })
                .collect();
            let report = ClassificationReport::from_pairs(&pairs);
            println!("{report}");
        }
    }

    Ok(())
}
