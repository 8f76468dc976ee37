use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use gaussian_bayes::{accuracy, Dataset, GaussianNaiveBayes, VariancePolicy};
use log::LevelFilter;
use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Builtin {
    Iris,
    Banknote,
}

impl Builtin {
    fn file_name(self) -> &'static str {
        match self {
            Builtin::Iris => "iris.csv",
            Builtin::Banknote => "banknote_authentication.csv",
        }
    }
}

#[derive(Parser, Debug)]
#[clap(
    name = "gaussian_bayes",
    version,
    about = "Fits a Gaussian Naive Bayes classifier and reports its accuracy."
)]
struct Args {
    /// One of the bundled datasets. Without this or `--train` a menu is shown.
    #[clap(long, value_enum, conflicts_with = "train")]
    dataset: Option<Builtin>,

    /// Directory holding the bundled dataset files.
    #[clap(long, default_value = "datasets")]
    data_dir: PathBuf,

    /// CSV file to fit on.
    #[clap(long)]
    train: Option<PathBuf>,

    /// CSV file to score against. Defaults to the training data.
    #[clap(long)]
    test: Option<PathBuf>,

    /// Keep NaN standard deviations for classes with a single row instead of failing.
    #[clap(long)]
    propagate_nan: bool,

    /// Increase log output (-v info, -vv debug).
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

// Shows the dataset menu and reads the choice from stdin:
fn choose_dataset() -> Result<Builtin> {
    print!("1. Iris Dataset\n2. Banknote Dataset\n: ");
    io::stdout().flush()?;

    let mut selection = String::new();
    io::stdin()
        .lock()
        .read_line(&mut selection)
        .context("failed to read dataset selection")?;

    Ok(match selection.trim().parse::<u32>() {
        Ok(1) => Builtin::Iris,
        _ => Builtin::Banknote,
    })
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let train_path = match (&args.train, args.dataset) {
        (Some(path), _) => path.clone(),
        (None, Some(builtin)) => args.data_dir.join(builtin.file_name()),
        (None, None) => args.data_dir.join(choose_dataset()?.file_name()),
    };

    let train = Dataset::from_path(&train_path)
        .with_context(|| format!("failed to load {}", train_path.display()))?;

    let test = match &args.test {
        Some(path) => Dataset::from_path_with_labels(path, train.index.clone())
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => train.clone(),
    };

    let policy = if args.propagate_nan {
        VariancePolicy::Propagate
    } else {
        VariancePolicy::Strict
    };
    let mut classifier = GaussianNaiveBayes::with_policy(policy);
    classifier
        .fit(&train.features, &train.labels)
        .context("failed to fit the classifier")?;

    let predictions = classifier
        .predict(&test.features)
        .context("failed to predict")?;
    let result = accuracy(&predictions, &test.labels)?;

    println!("{}", result);

    Ok(())
}
