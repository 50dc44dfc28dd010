use burn::tensor::{backend::Backend, Tensor};

use crate::data::record::{Direction, Field};

/// One direction of a collated batch.
#[derive(Clone, Debug)]
pub struct SeriesBatch<B: Backend> {
    pub values: Tensor<B, 3>,     // [B, T, F]
    pub masks: Tensor<B, 3>,      // [B, T, F]
    pub deltas: Tensor<B, 3>,     // [B, T, F]
    pub forwards: Tensor<B, 3>,   // [B, T, F]
    pub evals: Tensor<B, 3>,      // [B, T, F]
    pub eval_masks: Tensor<B, 3>, // [B, T, F]
}

impl<B: Backend> SeriesBatch<B> {
    pub fn field(&self, field: Field) -> &Tensor<B, 3> {
        match field {
            Field::Values => &self.values,
            Field::Masks => &self.masks,
            Field::Deltas => &self.deltas,
            Field::Forwards => &self.forwards,
            Field::Evals => &self.evals,
            Field::EvalMasks => &self.eval_masks,
        }
    }

    /// `[B, T, F]`, shared by all six tensors.
    pub fn dims(&self) -> [usize; 3] {
        self.values.dims()
    }
}

#[derive(Clone, Debug)]
pub struct Batch<B: Backend> {
    pub forward: SeriesBatch<B>,
    pub backward: SeriesBatch<B>,
    pub labels: Tensor<B, 1>,   // [B]
    pub is_train: Tensor<B, 1>, // [B], 1.0 train / 0.0 validation
}

impl<B: Backend> Batch<B> {
    pub fn direction(&self, direction: Direction) -> &SeriesBatch<B> {
        match direction {
            Direction::Forward => &self.forward,
            Direction::Backward => &self.backward,
        }
    }

    pub fn batch_size(&self) -> usize {
        self.labels.dims()[0]
    }
}
