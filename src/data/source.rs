use std::fs;
use std::path::{Path, PathBuf};

use burn::config::Config;
use burn::data::dataset::Dataset;

use crate::data::record::Example;
use crate::data::split::{SplitAssignment, SPLIT_ALGORITHM};
use crate::error::{DataError, Result as DataResult};

#[derive(Config, Debug)]
pub struct RecordSourceConfig {
    #[config(default = "String::from(\"./json/json\")")]
    pub path: String,
    #[config(default = 0.2)]
    pub val_ratio: f64,
    #[config(default = 42)]
    pub seed: u64,
}

impl RecordSourceConfig {
    pub fn init(&self) -> DataResult<RecordSource> {
        RecordSource::open(&self.path, self.val_ratio, self.seed)
    }
}

/// Random-access view over a JSON Lines record file.
///
/// Lines are kept as raw text and parsed on every lookup. The split is
/// computed once at open time and never changes afterwards.
#[derive(Debug)]
pub struct RecordSource {
    path: PathBuf,
    lines: Vec<String>,
    split: SplitAssignment,
    seed: u64,
}

impl RecordSource {
    pub fn open(path: impl AsRef<Path>, val_ratio: f64, seed: u64) -> DataResult<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Err(DataError::NotFound { path });
        }

        let content = fs::read_to_string(&path).map_err(|source| DataError::Io {
            path: path.clone(),
            source,
        })?;
        let lines: Vec<String> = content.lines().map(str::to_owned).collect();
        let split = SplitAssignment::assign(lines.len(), val_ratio, seed)?;

        tracing::info!(
            "Opened {} with {} records ({} train / {} validation, split {} seed {})",
            path.display(),
            lines.len(),
            split.train_len(),
            split.validation_len(),
            SPLIT_ALGORITHM,
            seed,
        );

        Ok(Self {
            path,
            lines,
            split,
            seed,
        })
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Always `false`: opening an empty file fails.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn split(&self) -> &SplitAssignment {
        &self.split
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Parse record `index` and tag it with its partition.
    pub fn get(&self, index: usize) -> DataResult<Example> {
        let line = self.lines.get(index).ok_or(DataError::IndexOutOfRange {
            index,
            len: self.lines.len(),
        })?;

        let mut example = Example::from_json(line).map_err(|err| DataError::MalformedRecord {
            index,
            reason: err.to_string(),
        })?;
        example.is_train = !self.split.is_validation(index);

        Ok(example)
    }
}

impl Dataset<Example> for RecordSource {
    fn get(&self, index: usize) -> Option<Example> {
        match RecordSource::get(self, index) {
            Ok(example) => Some(example),
            Err(DataError::IndexOutOfRange { .. }) => None,
            // burn ends the epoch at the first `None`, so a bad line must not
            // look like the end of the data.
            Err(err) => {
                tracing::error!("Cannot load record: {}", err);
                panic!("cannot load record: {err}");
            }
        }
    }

    fn len(&self) -> usize {
        self.lines.len()
    }
}
