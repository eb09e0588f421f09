use fareml_core::{Float, Tensor, TensorError, TensorResult};
use serde::{Deserialize, Serialize};

/// Pair up truth and prediction values as `f64`, rejecting empty or
/// mismatched inputs.
fn pairs<'a, T: Float>(
    y_true: &'a Tensor<T>,
    y_pred: &'a Tensor<T>,
) -> TensorResult<impl Iterator<Item = (f64, f64)> + 'a> {
    if y_true.numel() != y_pred.numel() {
        return Err(TensorError::ShapeMismatch {
            expected: y_true.shape_vec(),
            got: y_pred.shape_vec(),
        });
    }
    if y_true.numel() == 0 {
        return Err(TensorError::Empty);
    }
    Ok(y_true
        .data()
        .iter()
        .zip(y_pred.data())
        .map(|(&t, &p)| (t.to_f64(), p.to_f64())))
}

/// Mean squared error.
pub fn mse<T: Float>(y_true: &Tensor<T>, y_pred: &Tensor<T>) -> TensorResult<f64> {
    let n = y_true.numel() as f64;
    let sum: f64 = pairs(y_true, y_pred)?.map(|(t, p)| (t - p) * (t - p)).sum();
    Ok(sum / n)
}

/// Root mean squared error.
pub fn rmse<T: Float>(y_true: &Tensor<T>, y_pred: &Tensor<T>) -> TensorResult<f64> {
    Ok(mse(y_true, y_pred)?.sqrt())
}

/// Mean absolute error.
pub fn mae<T: Float>(y_true: &Tensor<T>, y_pred: &Tensor<T>) -> TensorResult<f64> {
    let n = y_true.numel() as f64;
    let sum: f64 = pairs(y_true, y_pred)?.map(|(t, p)| (t - p).abs()).sum();
    Ok(sum / n)
}

/// Coefficient of determination, `1 - SS_res / SS_tot`.
///
/// Zero when the true values are constant.
pub fn r2_score<T: Float>(y_true: &Tensor<T>, y_pred: &Tensor<T>) -> TensorResult<f64> {
    let n = y_true.numel() as f64;
    let mean = pairs(y_true, y_pred)?.map(|(t, _)| t).sum::<f64>() / n;
    let (ss_res, ss_tot) = pairs(y_true, y_pred)?.fold((0.0, 0.0), |(res, tot), (t, p)| {
        (res + (t - p) * (t - p), tot + (t - mean) * (t - mean))
    });
    if ss_tot < 1e-15 {
        return Ok(0.0);
    }
    Ok(1.0 - ss_res / ss_tot)
}

/// Goodness-of-fit summary for one regression model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionMetrics {
    pub mae: f64,
    pub mse: f64,
    pub rmse: f64,
    pub r2: f64,
}

impl RegressionMetrics {
    pub fn compute<T: Float>(y_true: &Tensor<T>, y_pred: &Tensor<T>) -> TensorResult<Self> {
        let mse = mse(y_true, y_pred)?;
        Ok(RegressionMetrics {
            mae: mae(y_true, y_pred)?,
            mse,
            rmse: mse.sqrt(),
            r2: r2_score(y_true, y_pred)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn t(values: &[f64]) -> Tensor<f64> {
        Tensor::from_slice(values)
    }

    #[test]
    fn test_perfect_prediction() {
        let y = t(&[1.0, 2.0, 3.0, 4.0]);
        assert_abs_diff_eq!(mse(&y, &y).unwrap(), 0.0);
        assert_abs_diff_eq!(r2_score(&y, &y).unwrap(), 1.0);
    }

    #[test]
    fn test_r2_constant_truth() {
        let y_true = t(&[5.0, 5.0, 5.0]);
        let y_pred = t(&[4.0, 6.0, 5.0]);
        assert_eq!(r2_score(&y_true, &y_pred).unwrap(), 0.0);
    }

    #[test]
    fn test_mae_and_rmse() {
        let y_true = t(&[1.0, 2.0, 3.0]);
        let y_pred = t(&[1.5, 2.5, 3.5]);
        assert_abs_diff_eq!(mae(&y_true, &y_pred).unwrap(), 0.5);
        assert_abs_diff_eq!(rmse(&y_true, &y_pred).unwrap(), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_metrics_summary() {
        let y_true = t(&[10.0, 20.0, 30.0, 40.0]);
        let y_pred = t(&[12.0, 18.0, 33.0, 37.0]);
        let m = RegressionMetrics::compute(&y_true, &y_pred).unwrap();
        assert_abs_diff_eq!(m.mae, 2.5);
        assert_abs_diff_eq!(m.mse, 6.5);
        assert_abs_diff_eq!(m.rmse, 6.5f64.sqrt());
        assert_abs_diff_eq!(m.r2, 1.0 - 26.0 / 500.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rmse_non_negative_and_r2_bounded() {
        let y_true = t(&[3.0, -1.0, 8.0, 0.5, 2.0]);
        let y_pred = t(&[-20.0, 14.0, 0.0, 9.0, -3.0]);
        let m = RegressionMetrics::compute(&y_true, &y_pred).unwrap();
        assert!(m.rmse >= 0.0);
        assert!(m.r2 < 0.0);
    }

    #[test]
    fn test_f32_inputs() {
        let y_true: Tensor<f32> = Tensor::from_slice(&[2.0, 4.0]);
        let y_pred: Tensor<f32> = Tensor::from_slice(&[3.0, 3.0]);
        assert_abs_diff_eq!(mse(&y_true, &y_pred).unwrap(), 1.0);
    }

    #[test]
    fn test_metrics_reject_bad_input() {
        let empty = t(&[]);
        assert_eq!(RegressionMetrics::compute(&empty, &empty), Err(TensorError::Empty));
        assert!(matches!(
            RegressionMetrics::compute(&t(&[1.0, 2.0]), &t(&[1.0])),
            Err(TensorError::ShapeMismatch { .. })
        ));
    }
}
