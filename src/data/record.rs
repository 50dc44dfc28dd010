use serde::{Deserialize, Serialize};

/// One observation of all F features at a single time index.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TimeStep {
    pub values: Vec<f32>,
    pub masks: Vec<f32>,
    pub deltas: Vec<f32>,
    pub forwards: Vec<f32>,
    pub evals: Vec<f32>,
    pub eval_masks: Vec<f32>,
}

impl TimeStep {
    pub fn field(&self, field: Field) -> &[f32] {
        match field {
            Field::Values => &self.values,
            Field::Masks => &self.masks,
            Field::Deltas => &self.deltas,
            Field::Forwards => &self.forwards,
            Field::Evals => &self.evals,
            Field::EvalMasks => &self.eval_masks,
        }
    }

    /// Feature count, taken from `values`.
    pub fn num_features(&self) -> usize {
        self.values.len()
    }
}

/// One direction of an example, `T` steps long.
pub type Sequence = Vec<TimeStep>;

/// A single training instance as stored on one line of the record file.
///
/// `is_train` is never read from the file; the record source fills it in
/// from the split assignment.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Example {
    pub forward: Sequence,
    pub backward: Sequence,
    pub label: f32,
    #[serde(skip)]
    pub is_train: bool,
}

impl Example {
    pub fn from_json(line: &str) -> serde_json::Result<Self> {
        serde_json::from_str(line)
    }

    pub fn direction(&self, direction: Direction) -> &Sequence {
        match direction {
            Direction::Forward => &self.forward,
            Direction::Backward => &self.backward,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn name(&self) -> &'static str {
        match self {
            Direction::Forward => "forward",
            Direction::Backward => "backward",
        }
    }
}

/// The six per-step vectors packed into `[B, T, F]` tensors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Values,
    Masks,
    Deltas,
    Forwards,
    Evals,
    EvalMasks,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Values,
        Field::Masks,
        Field::Deltas,
        Field::Forwards,
        Field::Evals,
        Field::EvalMasks,
    ];

    /// JSON key of the field.
    pub fn name(&self) -> &'static str {
        match self {
            Field::Values => "values",
            Field::Masks => "masks",
            Field::Deltas => "deltas",
            Field::Forwards => "forwards",
            Field::Evals => "evals",
            Field::EvalMasks => "eval_masks",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE: &str = r#"{"forward":[{"values":[1,2],"masks":[1,0],"deltas":[0,1],"forwards":[1,2],"evals":[1,3],"eval_masks":[0,1]}],"backward":[{"values":[1,2],"masks":[1,0],"deltas":[0,0],"forwards":[1,2],"evals":[1,3],"eval_masks":[0,1]}],"label":1}"#;

    #[test]
    fn parses_integer_numbers_as_floats() {
        let example = Example::from_json(LINE).unwrap();

        assert_eq!(example.label, 1.0);
        assert_eq!(example.forward.len(), 1);
        assert_eq!(example.forward[0].values, vec![1.0, 2.0]);
        assert_eq!(example.backward[0].field(Field::EvalMasks), &[0.0, 1.0]);
        assert_eq!(example.forward[0].num_features(), 2);
    }

    #[test]
    fn ignores_is_train_in_the_file() {
        let line = LINE.replacen("\"label\":1", "\"label\":1,\"is_train\":1", 1);
        let example = Example::from_json(&line).unwrap();
        assert!(!example.is_train);
    }

    #[test]
    fn missing_label_is_rejected() {
        let line = LINE.replacen(",\"label\":1", "", 1);
        let err = Example::from_json(&line).unwrap_err();
        assert!(err.to_string().contains("label"));
    }

    #[test]
    fn missing_step_field_is_rejected() {
        let line = LINE.replacen("\"deltas\":[0,1],", "", 1);
        assert!(Example::from_json(&line).is_err());
    }

    #[test]
    fn field_names_match_json_keys() {
        let names: Vec<&str> = Field::ALL.iter().map(|f| f.name()).collect();
        assert_eq!(
            names,
            vec!["values", "masks", "deltas", "forwards", "evals", "eval_masks"]
        );
    }
}
