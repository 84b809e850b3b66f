//! Train a decision tree on a delimited file, report validation accuracy and
//! classify new feature vectors.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use rand::{rngs::StdRng, SeedableRng};
use rusty_cart::data::features::{FeatureSet, IRIS_FEATURES};
use rusty_cart::data::loader::{parse_input, CsvLoader};
use rusty_cart::logging;
use rusty_cart::trees::evaluation::train_and_evaluate;
use rusty_cart::trees::params::TreeParams;
use tracing::warn;

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let options = parse_args(std::env::args().skip(1).collect())?;
    if let Err(err) = logging::init() {
        eprintln!("{err}");
    }

    let (dataset, features) = load(&options)?;
    println!(
        "Loaded {} rows with features: {}",
        dataset.nrows(),
        features
    );

    let mut tree_params = TreeParams::new();
    tree_params
        .set_min_samples_split(options.min_samples_split)
        .map_err(|err| err.to_string())?;
    tree_params
        .set_max_depth(options.max_depth)
        .map_err(|err| err.to_string())?;

    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let evaluation = train_and_evaluate(
        &dataset,
        &features,
        options.train_size,
        &tree_params,
        &mut rng,
    )
    .map_err(|err| err.to_string())?;

    println!(
        "Trained on {} rows, validated on {} rows",
        evaluation.train_size, evaluation.validation_size
    );
    println!("Accuracy: {}", evaluation.accuracy);
    println!("confusion matrix (rows=true, cols=pred):");
    print!("{}", evaluation.confusion);

    let classifier = &evaluation.classifier;
    if options.show_tree {
        if let Some(root) = classifier.root() {
            print!("{root}");
        }
    }

    if let Some(line) = &options.classify {
        let input = parse_input(line, &features).map_err(|err| err.to_string())?;
        let label = classifier.classify(&input).map_err(|err| err.to_string())?;
        println!("Classified as: {label}");
    }

    if options.interactive {
        let stdin = io::stdin();
        loop {
            print!("Enter new data for classification (comma-separated): ");
            io::stdout().flush().map_err(|err| err.to_string())?;
            let mut line = String::new();
            let read = stdin
                .lock()
                .read_line(&mut line)
                .map_err(|err| err.to_string())?;
            if read == 0 || line.trim().is_empty() {
                break;
            }
            match parse_input(&line, &features).and_then(|input| classifier.classify(&input)) {
                Ok(label) => println!("Classified as: {label}"),
                Err(err) => warn!("{err}"),
            }
        }
    }

    Ok(())
}

fn load(
    options: &CliOptions,
) -> Result<(rusty_cart::data::dataset::Dataset<f64, String>, FeatureSet), String> {
    let loader = CsvLoader::new().has_headers(options.header);
    let (dataset, features) = loader
        .load_path(&options.data)
        .map_err(|err| format!("{}: {err}", options.data.display()))?;

    // Header-less four column files are assumed to be the iris measurements.
    if !options.header && features == FeatureSet::numbered(IRIS_FEATURES.len()) {
        return Ok((dataset, FeatureSet::iris()));
    }
    Ok((dataset, features))
}

#[derive(Debug, Clone)]
struct CliOptions {
    data: PathBuf,
    header: bool,
    train_size: f64,
    seed: Option<u64>,
    max_depth: Option<u16>,
    min_samples_split: u16,
    classify: Option<String>,
    interactive: bool,
    show_tree: bool,
}

fn parse_args(args: Vec<String>) -> Result<CliOptions, String> {
    let mut data: Option<PathBuf> = None;
    let mut header = false;
    let mut train_size = 0.8f64;
    let mut seed: Option<u64> = None;
    let mut max_depth: Option<u16> = None;
    let mut min_samples_split = 2u16;
    let mut classify: Option<String> = None;
    let mut interactive = false;
    let mut show_tree = false;

    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "-h" | "--help" => return Err(help_text()),
            "--data" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--data requires a value".to_string())?;
                data = Some(PathBuf::from(value));
            }
            "--header" => header = true,
            "--train-size" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--train-size requires a value".to_string())?;
                train_size = value
                    .parse::<f64>()
                    .map_err(|_| format!("Invalid --train-size value: {value}"))?;
            }
            "--seed" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--seed requires a value".to_string())?;
                seed = Some(
                    value
                        .parse::<u64>()
                        .map_err(|_| format!("Invalid --seed value: {value}"))?,
                );
            }
            "--max-depth" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--max-depth requires a value".to_string())?;
                max_depth = Some(
                    value
                        .parse::<u16>()
                        .map_err(|_| format!("Invalid --max-depth value: {value}"))?,
                );
            }
            "--min-samples-split" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--min-samples-split requires a value".to_string())?;
                min_samples_split = value
                    .parse::<u16>()
                    .map_err(|_| format!("Invalid --min-samples-split value: {value}"))?;
            }
            "--classify" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--classify requires a value".to_string())?;
                classify = Some(value.clone());
            }
            "--interactive" => interactive = true,
            "--show-tree" => show_tree = true,
            unknown => return Err(format!("Unknown argument: {unknown}\n\n{}", help_text())),
        }
        idx += 1;
    }

    let data = data.ok_or_else(|| format!("--data is required\n\n{}", help_text()))?;
    Ok(CliOptions {
        data,
        header,
        train_size,
        seed,
        max_depth,
        min_samples_split,
        classify,
        interactive,
        show_tree,
    })
}

fn help_text() -> String {
    [
        "Usage: cart --data <path> [options]",
        "",
        "Trains a Gini decision tree on comma separated rows (last field is the label),",
        "reports accuracy on a held-out part and classifies new vectors.",
        "",
        "Options:",
        "  --data <path>               Input file",
        "  --header                    First line names the features",
        "  --train-size <fraction>     Share of rows used for training (default 0.8)",
        "  --seed <n>                  Seed for the train/validation shuffle",
        "  --max-depth <n>             Stop splitting at this depth",
        "  --min-samples-split <n>     Smallest node that may be split (default 2)",
        "  --classify <v1,v2,...>      Classify one feature vector",
        "  --interactive               Classify vectors read from stdin, one per line",
        "  --show-tree                 Print the trained tree",
        "  -h, --help                  Show this help",
    ]
    .join("\n")
}
