use fareml_core::{Float, Tensor};
use fareml_core::error::TensorResult;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Encode categorical string values as integer indices.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabelEncoder {
    pub classes: Vec<String>,
    #[serde(skip)]
    class_to_idx: HashMap<String, usize>,
}

impl LabelEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fit the encoder on observed values. Classes are kept sorted.
    pub fn fit<S: AsRef<str>>(&mut self, values: &[S]) {
        let mut unique: Vec<String> = values.iter().map(|v| v.as_ref().to_string()).collect();
        unique.sort();
        unique.dedup();
        self.classes = unique;
        self.rebuild_index();
    }

    /// Index of `value`, or `None` for a class not seen during `fit`.
    pub fn index_of(&self, value: &str) -> Option<usize> {
        if self.class_to_idx.len() == self.classes.len() {
            self.class_to_idx.get(value).copied()
        } else {
            // Lookup table is skipped by serde; fall back to the sorted class list.
            self.classes.binary_search_by(|c| c.as_str().cmp(value)).ok()
        }
    }

    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    /// Restore the lookup table after deserialisation.
    pub fn rebuild_index(&mut self) {
        self.class_to_idx = self
            .classes
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), i))
            .collect();
    }
}

/// One-hot encode a single categorical column into an indicator matrix.
///
/// A value not seen during `fit` encodes to an all-zero row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OneHotEncoder {
    labels: LabelEncoder,
}

impl OneHotEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fit<S: AsRef<str>>(&mut self, values: &[S]) {
        self.labels.fit(values);
    }

    /// Number of indicator columns produced by `transform`.
    pub fn width(&self) -> usize {
        self.labels.n_classes()
    }

    pub fn categories(&self) -> &[String] {
        &self.labels.classes
    }

    /// Encode `values` into a `[n, width]` matrix.
    pub fn transform<T: Float, S: AsRef<str>>(&self, values: &[S]) -> TensorResult<Tensor<T>> {
        let n = values.len();
        let k = self.width();
        let mut data = vec![T::ZERO; n * k];
        for (i, v) in values.iter().enumerate() {
            if let Some(cls) = self.labels.index_of(v.as_ref()) {
                data[i * k + cls] = T::ONE;
            }
        }
        Tensor::new(data, vec![n, k])
    }

    /// Write the indicator vector for one value into `out`.
    pub fn encode_into<T: Float>(&self, value: &str, out: &mut [T]) {
        for slot in out.iter_mut() {
            *slot = T::ZERO;
        }
        if let Some(cls) = self.labels.index_of(value) {
            out[cls] = T::ONE;
        }
    }

    pub fn fit_transform<T: Float, S: AsRef<str>>(&mut self, values: &[S]) -> TensorResult<Tensor<T>> {
        self.fit(values);
        self.transform(values)
    }
}
