use burn::data::dataloader::batcher::Batcher;
use burn::tensor::backend::Backend;
use burn::tensor::{Data, Shape, Tensor};

use crate::data::batch::{Batch, SeriesBatch};
use crate::data::record::{Example, Field, Sequence};
use crate::error::{DataError, Result};

/// Host-side `[B, T, F]` buffers for the six step fields, in `Field::ALL` order.
#[derive(Debug)]
struct SeriesGrid {
    dims: [usize; 3],
    fields: [Vec<f32>; 6],
}

impl SeriesGrid {
    fn pack(sequences: &[&Sequence]) -> Result<Self> {
        let first = sequences.first().ok_or_else(|| {
            DataError::ShapeMismatch("cannot collate an empty batch".to_string())
        })?;
        let batch_size = sequences.len();
        let steps = first.len();
        let features = first.first().map(|step| step.num_features()).unwrap_or(0);

        let capacity = batch_size * steps * features;
        let mut fields: [Vec<f32>; 6] = std::array::from_fn(|_| Vec::with_capacity(capacity));

        // batch, then time, then feature
        for (b, sequence) in sequences.iter().enumerate() {
            if sequence.len() != steps {
                return Err(DataError::ShapeMismatch(format!(
                    "example {b} has {} time steps, expected {steps}",
                    sequence.len()
                )));
            }
            for (t, step) in sequence.iter().enumerate() {
                for (field, buffer) in Field::ALL.iter().zip(fields.iter_mut()) {
                    let row = step.field(*field);
                    if row.len() != features {
                        return Err(DataError::ShapeMismatch(format!(
                            "example {b} step {t} has {} {} features, expected {features}",
                            row.len(),
                            field.name()
                        )));
                    }
                    buffer.extend_from_slice(row);
                }
            }
        }

        Ok(Self {
            dims: [batch_size, steps, features],
            fields,
        })
    }

    fn into_tensors<B: Backend>(self, device: &B::Device) -> SeriesBatch<B> {
        let dims = self.dims;
        let [values, masks, deltas, forwards, evals, eval_masks] =
            self.fields.map(|buffer| to_tensor::<B, 3>(buffer, dims, device));

        SeriesBatch {
            values,
            masks,
            deltas,
            forwards,
            evals,
            eval_masks,
        }
    }
}

fn to_tensor<B: Backend, const D: usize>(
    values: Vec<f32>,
    dims: [usize; D],
    device: &B::Device,
) -> Tensor<B, D> {
    let data = Data::new(values, Shape::new(dims));
    let tensor: Tensor<B, D> = Tensor::from_data(data.convert());
    tensor.to_device(device)
}

/// Stack `B` sequences of one direction into six `[B, T, F]` tensors.
///
/// Every sequence must have the same number of steps and every step vector
/// the same length; nothing is padded.
pub fn pack_time_series<B: Backend>(
    sequences: &[&Sequence],
    device: &B::Device,
) -> Result<SeriesBatch<B>> {
    Ok(SeriesGrid::pack(sequences)?.into_tensors(device))
}

#[derive(Clone, Debug)]
pub struct BatchPacker<B: Backend> {
    device: B::Device,
}

impl<B: Backend> BatchPacker<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }

    pub fn device(&self) -> &B::Device {
        &self.device
    }

    /// Collate examples into one batch, keeping their order on the batch axis.
    pub fn collate(&self, examples: &[Example]) -> Result<Batch<B>> {
        let forward: Vec<&Sequence> = examples.iter().map(|e| &e.forward).collect();
        let backward: Vec<&Sequence> = examples.iter().map(|e| &e.backward).collect();

        let forward = SeriesGrid::pack(&forward)?;
        let backward = SeriesGrid::pack(&backward)?;
        if forward.dims != backward.dims {
            return Err(DataError::ShapeMismatch(format!(
                "forward series are {:?} but backward series are {:?}",
                forward.dims, backward.dims
            )));
        }

        let batch_size = examples.len();
        let labels: Vec<f32> = examples.iter().map(|e| e.label).collect();
        let is_train: Vec<f32> = examples
            .iter()
            .map(|e| if e.is_train { 1.0 } else { 0.0 })
            .collect();

        tracing::debug!("Collated batch with [B, T, F] = {:?}", forward.dims);

        Ok(Batch {
            forward: forward.into_tensors(&self.device),
            backward: backward.into_tensors(&self.device),
            labels: to_tensor(labels, [batch_size], &self.device),
            is_train: to_tensor(is_train, [batch_size], &self.device),
        })
    }
}

impl<B: Backend> Batcher<Example, Batch<B>> for BatchPacker<B> {
    /// # Panics
    /// Panics if the examples disagree on shape, since `Batcher` cannot
    /// return an error. Use [`BatchPacker::collate`] to handle it instead.
    ///
    /// Inside a multi-worker burn loader the panic happens on a worker
    /// thread: the message goes to that thread's stderr and the loader
    /// itself fails with a `RecvError`. Iterate with `num_workers(Some(0))`
    /// or call `collate` directly to see the `DataError`.
    fn batch(&self, items: Vec<Example>) -> Batch<B> {
        match self.collate(&items) {
            Ok(batch) => batch,
            Err(err) => panic!("cannot collate batch: {err}"),
        }
    }
}
