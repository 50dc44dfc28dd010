//! Loading and collation of bidirectional time series records for burn.
//!
//! Records live one JSON object per line, each holding a forward series, its
//! time-reversed backward series and a scalar label. [`RecordSource`] gives
//! random access to them and tags each one as train or validation from a
//! seeded [`SplitAssignment`]. [`BatchPacker`] stacks a list of examples into
//! `[B, T, F]` tensors per field and direction.

pub mod data;
pub mod error;

pub use data::batch::{Batch, SeriesBatch};
pub use data::loader::{build_loader, default_num_workers, LoaderConfig};
pub use data::packer::{pack_time_series, BatchPacker};
pub use data::record::{Direction, Example, Field, Sequence, TimeStep};
pub use data::source::{RecordSource, RecordSourceConfig};
pub use data::split::{SplitAssignment, SPLIT_ALGORITHM};
pub use error::{DataError, Result};
