use crate::dtype::Float;
use crate::error::{TensorError, TensorResult};
use crate::shape::Shape;

use serde::{Deserialize, Serialize};

/// Dense row-major storage for label vectors (`[n]`) and feature
/// matrices (`[rows, cols]`).
///
/// Row `i` of a matrix is `data[i * cols..(i + 1) * cols]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "T: Float")]
pub struct Tensor<T: Float> {
    data: Vec<T>,
    shape: Shape,
}

impl<T: Float> Tensor<T> {
    /// Wrap `data` with `shape`, checking that the element counts agree.
    pub fn new(data: Vec<T>, shape: Vec<usize>) -> TensorResult<Self> {
        let shape = Shape::new(shape);
        if data.len() != shape.numel() {
            return Err(TensorError::ShapeMismatch {
                expected: shape.to_vec(),
                got: vec![data.len()],
            });
        }
        Ok(Tensor { data, shape })
    }

    pub fn zeros(shape: Vec<usize>) -> Self {
        let shape = Shape::new(shape);
        Tensor {
            data: vec![T::ZERO; shape.numel()],
            shape,
        }
    }

    /// A 1D vector.
    pub fn from_slice(data: &[T]) -> Self {
        Tensor {
            data: data.to_vec(),
            shape: Shape::new(vec![data.len()]),
        }
    }

    /// A `[rows.len(), width]` matrix; every row must have the same width.
    pub fn from_rows(rows: &[Vec<T>]) -> TensorResult<Self> {
        let width = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * width);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(TensorError::RaggedRows {
                    row: i,
                    expected: width,
                    got: row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Tensor::new(data, vec![rows.len(), width])
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn shape_vec(&self) -> Vec<usize> {
        self.shape.to_vec()
    }

    pub fn ndim(&self) -> usize {
        self.shape.ndim()
    }

    pub fn numel(&self) -> usize {
        self.data.len()
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Borrow row `i` of a matrix.
    pub fn row(&self, i: usize) -> TensorResult<&[T]> {
        let (rows, cols) = self.shape.matrix_dims()?;
        if i >= rows {
            return Err(TensorError::RowOutOfBounds { index: i, rows });
        }
        Ok(&self.data[i * cols..(i + 1) * cols])
    }

    /// Element at row `i`, column `j` of a matrix.
    pub fn at(&self, i: usize, j: usize) -> TensorResult<T> {
        let row = self.row(i)?;
        row.get(j).copied().ok_or(TensorError::FeatureOutOfBounds {
            index: j,
            width: row.len(),
        })
    }

    /// Join matrices with equal row counts side by side, in order.
    pub fn hstack(blocks: &[&Tensor<T>]) -> TensorResult<Tensor<T>> {
        let first = blocks.first().ok_or(TensorError::Empty)?;
        let (rows, _) = first.shape.matrix_dims()?;
        let mut width = 0;
        for block in blocks {
            let (r, c) = block.shape.matrix_dims()?;
            if r != rows {
                return Err(TensorError::ShapeMismatch {
                    expected: vec![rows, c],
                    got: block.shape_vec(),
                });
            }
            width += c;
        }

        let mut data = Vec::with_capacity(rows * width);
        for i in 0..rows {
            for block in blocks {
                data.extend_from_slice(block.row(i)?);
            }
        }
        Tensor::new(data, vec![rows, width])
    }

    /// Turn an `[n]` vector into an `[n, 1]` column matrix.
    pub fn into_column(self) -> TensorResult<Tensor<T>> {
        if self.ndim() != 1 {
            return Err(TensorError::NotAVector(self.shape_vec()));
        }
        let n = self.data.len();
        Tensor::new(self.data, vec![n, 1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_checks_shape() {
        assert!(Tensor::<f64>::new(vec![1.0, 2.0, 3.0], vec![2, 2]).is_err());
        let t = Tensor::<f64>::new(vec![1.0, 2.0, 3.0, 4.0], vec![2, 2]).unwrap();
        assert_eq!(t.at(1, 0).unwrap(), 3.0);
    }

    #[test]
    fn test_from_rows() {
        let t: Tensor<f64> = Tensor::from_rows(&[
            vec![1.0, 2.0, 3.0],
            vec![4.0, 5.0, 6.0],
        ])
        .unwrap();
        assert_eq!(t.shape_vec(), vec![2, 3]);
        assert_eq!(t.at(1, 2).unwrap(), 6.0);
        assert_eq!(t.row(1).unwrap(), &[4.0, 5.0, 6.0]);
        assert_eq!(t.row(2), Err(TensorError::RowOutOfBounds { index: 2, rows: 2 }));
        assert_eq!(
            t.at(0, 3),
            Err(TensorError::FeatureOutOfBounds { index: 3, width: 3 })
        );
    }

    #[test]
    fn test_from_rows_ragged() {
        assert_eq!(
            Tensor::<f64>::from_rows(&[vec![1.0], vec![2.0, 3.0]]),
            Err(TensorError::RaggedRows { row: 1, expected: 1, got: 2 })
        );
    }

    #[test]
    fn test_hstack_blocks() {
        let onehot: Tensor<f64> =
            Tensor::new(vec![1.0, 0.0, 0.0, 1.0, 1.0, 0.0], vec![3, 2]).unwrap();
        let distance = Tensor::from_slice(&[2.5, 0.8, 11.0]).into_column().unwrap();
        let x = Tensor::hstack(&[&onehot, &distance]).unwrap();
        assert_eq!(x.shape_vec(), vec![3, 3]);
        assert_eq!(x.data(), &[1.0, 0.0, 2.5, 0.0, 1.0, 0.8, 1.0, 0.0, 11.0]);
    }

    #[test]
    fn test_hstack_row_mismatch() {
        let a: Tensor<f64> = Tensor::zeros(vec![3, 2]);
        let b: Tensor<f64> = Tensor::zeros(vec![2, 1]);
        assert!(Tensor::hstack(&[&a, &b]).is_err());
        assert_eq!(Tensor::<f64>::hstack(&[]), Err(TensorError::Empty));
    }

    #[test]
    fn test_into_column_requires_vector() {
        let m: Tensor<f32> = Tensor::zeros(vec![2, 2]);
        assert_eq!(m.into_column(), Err(TensorError::NotAVector(vec![2, 2])));
    }
}
