use std::sync::Arc;

use burn::config::Config;
use burn::data::dataloader::{DataLoader, DataLoaderBuilder};
use burn::tensor::backend::Backend;

use crate::data::batch::Batch;
use crate::data::packer::BatchPacker;
use crate::data::source::RecordSource;

const MAX_DEFAULT_WORKERS: usize = 2;

#[derive(Config, Debug)]
pub struct LoaderConfig {
    #[config(default = 64)]
    pub batch_size: usize,
    #[config(default = true)]
    pub shuffle: bool,
    /// `None` picks [`default_num_workers`].
    pub num_workers: Option<usize>,
}

impl LoaderConfig {
    pub fn workers(&self) -> usize {
        self.num_workers.unwrap_or_else(default_num_workers)
    }
}

/// `min(2, available cores)`.
pub fn default_num_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(MAX_DEFAULT_WORKERS)
        .min(MAX_DEFAULT_WORKERS)
}

/// Wire a record source and a packer into burn's data loader.
///
/// Shuffling reuses the dataset seed. The last batch may be smaller than
/// `batch_size`. Tensors are created on `device`.
pub fn build_loader<B: Backend>(
    source: RecordSource,
    device: B::Device,
    config: &LoaderConfig,
) -> Arc<dyn DataLoader<Batch<B>>> {
    let workers = config.workers();
    tracing::info!(
        "Building loader over {} records: batch size {}, shuffle {}, {} workers",
        source.len(),
        config.batch_size,
        config.shuffle,
        workers,
    );

    let mut builder =
        DataLoaderBuilder::new(BatchPacker::<B>::new(device)).batch_size(config.batch_size);
    if config.shuffle {
        builder = builder.shuffle(source.seed());
    }
    if workers > 0 {
        builder = builder.num_workers(workers);
    }

    builder.build(source)
}
