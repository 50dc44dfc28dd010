use anyhow::{Context, Result};
use burn::backend::NdArray;
use burn::config::Config;
use clap::{Args, Parser, Subcommand};

use brits_data::{build_loader, LoaderConfig, RecordSourceConfig};

/// Inspect and iterate bidirectional time series record files.
#[derive(Parser, Debug)]
#[command(name = "brits-data", version)]
struct Cli {
    #[command(flatten)]
    source: SourceArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct SourceArgs {
    /// JSON file with a saved RecordSourceConfig; overrides the flags below
    #[arg(long, global = true)]
    config: Option<String>,

    /// JSON Lines record file
    #[arg(long, global = true, default_value = "./json/json")]
    path: String,

    /// Fraction of records assigned to validation
    #[arg(long, global = true, default_value_t = 0.2)]
    val_ratio: f64,

    #[arg(long, global = true, default_value_t = 42)]
    seed: u64,
}

impl SourceArgs {
    fn to_config(&self) -> Result<RecordSourceConfig> {
        match &self.config {
            Some(file) => RecordSourceConfig::load(file)
                .map_err(|err| anyhow::anyhow!("cannot load config '{}': {:?}", file, err)),
            None => Ok(RecordSourceConfig::new()
                .with_path(self.path.clone())
                .with_val_ratio(self.val_ratio)
                .with_seed(self.seed)),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the train/validation partition
    Split,

    /// Run one pass of the data loader and log every batch shape
    Iterate(IterateArgs),
}

#[derive(Args, Debug)]
struct IterateArgs {
    #[arg(long, default_value_t = 64)]
    batch_size: usize,

    /// Keep file order instead of shuffling
    #[arg(long)]
    no_shuffle: bool,

    /// Worker threads, defaults to min(2, cores)
    #[arg(long)]
    num_workers: Option<usize>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("brits_data=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let source = cli
        .source
        .to_config()?
        .init()
        .context("cannot open record source")?;

    match cli.command {
        Command::Split => {
            let split = source.split();
            println!("records:    {}", split.len());
            println!("train:      {}", split.train_len());
            println!("validation: {}", split.validation_len());
            let indices: Vec<String> = split.validation_indices().map(|i| i.to_string()).collect();
            println!("validation indices: {}", indices.join(","));
        }
        Command::Iterate(args) => {
            let config = LoaderConfig::new()
                .with_batch_size(args.batch_size)
                .with_shuffle(!args.no_shuffle)
                .with_num_workers(args.num_workers);
            let loader = build_loader::<NdArray>(source, Default::default(), &config);

            let mut batches = 0;
            for batch in loader.iter() {
                tracing::info!(
                    "batch {}: forward {:?}, backward {:?}, labels {:?}",
                    batches,
                    batch.forward.dims(),
                    batch.backward.dims(),
                    batch.labels.dims(),
                );
                batches += 1;
            }
            println!("{batches} batches");
        }
    }

    Ok(())
}
