use crate::error::{TensorError, TensorResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Dimensions of a tensor: `[n]` for a vector, `[rows, cols]` for a matrix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shape {
    dims: Vec<usize>,
}

impl Shape {
    pub fn new(dims: Vec<usize>) -> Self {
        Shape { dims }
    }

    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    pub fn numel(&self) -> usize {
        self.dims.iter().product()
    }

    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    pub fn to_vec(&self) -> Vec<usize> {
        self.dims.clone()
    }

    /// `(rows, cols)` of a feature matrix.
    pub fn matrix_dims(&self) -> TensorResult<(usize, usize)> {
        match self.dims.as_slice() {
            &[rows, cols] => Ok((rows, cols)),
            _ => Err(TensorError::NotAMatrix(self.to_vec())),
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dims: Vec<String> = self.dims.iter().map(|d| d.to_string()).collect();
        write!(f, "({})", dims.join(", "))
    }
}

impl From<Vec<usize>> for Shape {
    fn from(dims: Vec<usize>) -> Self {
        Shape::new(dims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_dims() {
        let s = Shape::new(vec![120, 6]);
        assert_eq!(s.ndim(), 2);
        assert_eq!(s.numel(), 720);
        assert_eq!(s.matrix_dims().unwrap(), (120, 6));
        assert_eq!(
            Shape::new(vec![5]).matrix_dims(),
            Err(TensorError::NotAMatrix(vec![5]))
        );
    }

    #[test]
    fn test_empty_matrix() {
        let s: Shape = vec![0, 8].into();
        assert_eq!(s.numel(), 0);
        assert_eq!(s.matrix_dims().unwrap(), (0, 8));
    }

    #[test]
    fn test_display() {
        assert_eq!(Shape::new(vec![3, 11]).to_string(), "(3, 11)");
        assert_eq!(Shape::new(vec![4]).to_string(), "(4)");
    }
}
