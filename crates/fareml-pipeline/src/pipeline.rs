use fareml_core::error::TensorResult;
use fareml_core::Tensor;
use fareml_data::{labels, TaxiTrip};
use fareml_metrics::RegressionMetrics;
use fareml_tree::{BoostingParams, GradientBoostingRegressor};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::PipelineConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::features::FeatureEncoder;

/// Trait for supervised regressors operating on encoded feature matrices.
pub trait Estimator {
    fn fit(&mut self, x: &Tensor<f64>, y: &Tensor<f64>) -> TensorResult<()>;
    fn predict(&self, x: &Tensor<f64>) -> TensorResult<Tensor<f64>>;

    /// Predict a single encoded feature vector.
    fn predict_row(&self, row: &[f64]) -> TensorResult<f64> {
        let x = Tensor::new(row.to_vec(), vec![1, row.len()])?;
        Ok(self.predict(&x)?.data()[0])
    }
}

impl Estimator for GradientBoostingRegressor<f64> {
    fn fit(&mut self, x: &Tensor<f64>, y: &Tensor<f64>) -> TensorResult<()> {
        GradientBoostingRegressor::fit(self, x, y)
    }

    fn predict(&self, x: &Tensor<f64>) -> TensorResult<Tensor<f64>> {
        GradientBoostingRegressor::predict(self, x)
    }

    fn predict_row(&self, row: &[f64]) -> TensorResult<f64> {
        GradientBoostingRegressor::predict_row(self, row)
    }
}

/// Produces a fitted model from trips and a pipeline description.
pub trait Trainer {
    type Estimator: Estimator;

    fn fit(
        &self,
        trips: &[TaxiTrip],
        config: &PipelineConfig,
    ) -> PipelineResult<FittedModel<Self::Estimator>>;
}

/// Boosted regression trees with fixed hyperparameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoostedTreeTrainer {
    pub params: BoostingParams,
}

impl BoostedTreeTrainer {
    pub fn new(params: BoostingParams) -> Self {
        BoostedTreeTrainer { params }
    }
}

impl Trainer for BoostedTreeTrainer {
    type Estimator = GradientBoostingRegressor<f64>;

    fn fit(
        &self,
        trips: &[TaxiTrip],
        config: &PipelineConfig,
    ) -> PipelineResult<FittedModel<Self::Estimator>> {
        fit(trips, config, GradientBoostingRegressor::new(self.params.clone()))
    }
}

/// Fit `config`'s feature encoder on `trips`, then train `estimator` on the
/// encoded rows against the label column.
pub fn fit<E: Estimator>(
    trips: &[TaxiTrip],
    config: &PipelineConfig,
    mut estimator: E,
) -> PipelineResult<FittedModel<E>> {
    config.validate()?;
    if trips.is_empty() {
        return Err(PipelineError::EmptyDataset("train"));
    }

    let encoder = FeatureEncoder::fit(trips, &config.features)?;
    let x = encoder.transform(trips)?;
    let y = labels(trips, config.label);
    info!(
        label = %config.label,
        rows = trips.len(),
        features = encoder.width(),
        "training model"
    );
    debug!(label = %config.label, columns = ?encoder.feature_names(), "encoded feature layout");
    estimator.fit(&x, &y)?;

    Ok(FittedModel {
        config: config.clone(),
        encoder,
        estimator,
    })
}

/// A trained pipeline: feature encoder plus regressor for one label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FittedModel<E> {
    config: PipelineConfig,
    encoder: FeatureEncoder,
    estimator: E,
}

impl<E: Estimator> FittedModel<E> {
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn estimator(&self) -> &E {
        &self.estimator
    }

    /// Predict the label for one trip. The trip's own label value is ignored.
    pub fn predict(&self, trip: &TaxiTrip) -> PipelineResult<f32> {
        let mut row = Vec::with_capacity(self.encoder.width());
        self.encoder.transform_row(trip, &mut row);
        Ok(self.estimator.predict_row(&row)? as f32)
    }

    /// Predict every trip, in input order.
    pub fn predict_batch(&self, trips: &[TaxiTrip]) -> PipelineResult<Vec<f32>> {
        let mut row = Vec::with_capacity(self.encoder.width());
        trips
            .iter()
            .map(|trip| {
                self.encoder.transform_row(trip, &mut row);
                Ok(self.estimator.predict_row(&row)? as f32)
            })
            .collect()
    }

    /// Score predictions on `trips` against their label column.
    pub fn evaluate(&self, trips: &[TaxiTrip]) -> PipelineResult<RegressionMetrics> {
        if trips.is_empty() {
            return Err(PipelineError::EmptyDataset("evaluate"));
        }
        let x = self.encoder.transform(trips)?;
        let y_pred = self.estimator.predict(&x)?;
        let y_true = labels(trips, self.config.label);
        let metrics = RegressionMetrics::compute(&y_true, &y_pred)?;
        debug!(
            label = %self.config.label,
            rows = trips.len(),
            r2 = metrics.r2,
            rmse = metrics.rmse,
            "evaluated model"
        );
        Ok(metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use fareml_data::NumericColumn;

    fn trip(vendor: &str, distance: f32, time: f32, fare: f32) -> TaxiTrip {
        TaxiTrip {
            vendor_id: vendor.into(),
            rate_code: "1".into(),
            passenger_count: 1.0,
            trip_time: time,
            trip_distance: distance,
            payment_type: "CRD".into(),
            fare_amount: fare,
            consumption: distance * 0.1,
        }
    }

    fn linear_trips(n: usize) -> Vec<TaxiTrip> {
        (0..n)
            .map(|i| {
                let d = i as f32 * 0.25;
                let vendor = if i % 2 == 0 { "VTS" } else { "CMT" };
                trip(vendor, d, 120.0 + d * 150.0, 2.5 + 2.0 * d)
            })
            .collect()
    }

    fn small_trainer() -> BoostedTreeTrainer {
        BoostedTreeTrainer::new(BoostingParams {
            n_estimators: 40,
            min_samples_leaf: 2,
            ..BoostingParams::default()
        })
    }

    #[test]
    fn test_constant_label_predicts_constant() {
        let trips = vec![
            trip("VTS", 1.0, 300.0, 10.0),
            trip("CMT", 2.0, 500.0, 10.0),
            trip("VTS", 3.0, 700.0, 10.0),
        ];
        let model = BoostedTreeTrainer::default()
            .fit(&trips, &PipelineConfig::fare())
            .unwrap();
        for t in &trips {
            assert_abs_diff_eq!(model.predict(t).unwrap(), 10.0, epsilon = 1e-4);
        }
        let metrics = model.evaluate(&trips).unwrap();
        assert_abs_diff_eq!(metrics.rmse, 0.0, epsilon = 1e-6);
        assert_eq!(metrics.r2, 0.0);
    }

    #[test]
    fn test_fit_learns_fare() {
        let trips = linear_trips(80);
        let model = small_trainer().fit(&trips, &PipelineConfig::fare()).unwrap();
        let metrics = model.evaluate(&trips).unwrap();
        assert!(metrics.r2 > 0.9, "r2 = {}", metrics.r2);
        assert!(metrics.rmse >= 0.0);
    }

    #[test]
    fn test_training_is_deterministic() {
        let trips = linear_trips(60);
        let a = small_trainer().fit(&trips, &PipelineConfig::consumption()).unwrap();
        let b = small_trainer().fit(&trips, &PipelineConfig::consumption()).unwrap();
        assert_eq!(a.predict_batch(&trips).unwrap(), b.predict_batch(&trips).unwrap());
    }

    #[test]
    fn test_predict_batch_matches_single_rows() {
        let trips = linear_trips(30);
        let model = small_trainer().fit(&trips, &PipelineConfig::trip_time()).unwrap();
        let batch = model.predict_batch(&trips).unwrap();
        assert_eq!(batch.len(), trips.len());
        for (t, p) in trips.iter().zip(&batch) {
            assert_eq!(model.predict(t).unwrap(), *p);
        }
    }

    #[test]
    fn test_prediction_ignores_label_value() {
        let trips = linear_trips(30);
        let model = small_trainer().fit(&trips, &PipelineConfig::fare()).unwrap();
        let mut changed = trips[7].clone();
        let before = model.predict(&changed).unwrap();
        changed.fare_amount = 9999.0;
        assert_eq!(model.predict(&changed).unwrap(), before);
    }

    #[test]
    fn test_unseen_category_still_predicts() {
        let trips = linear_trips(30);
        let model = small_trainer().fit(&trips, &PipelineConfig::fare()).unwrap();
        let unseen = trip("DDS", 2.0, 420.0, 0.0);
        assert!(model.predict(&unseen).unwrap().is_finite());
    }

    #[test]
    fn test_empty_training_set_rejected() {
        assert_eq!(
            small_trainer().fit(&[], &PipelineConfig::fare()).unwrap_err(),
            PipelineError::EmptyDataset("train")
        );
    }

    #[test]
    fn test_label_in_features_rejected() {
        let config = PipelineConfig::new(
            NumericColumn::FareAmount,
            vec![NumericColumn::FareAmount.into()],
        );
        assert_eq!(
            small_trainer().fit(&linear_trips(10), &config).unwrap_err(),
            PipelineError::LabelInFeatures(NumericColumn::FareAmount)
        );
    }

    #[test]
    fn test_evaluate_empty_rejected() {
        let model = small_trainer().fit(&linear_trips(20), &PipelineConfig::fare()).unwrap();
        assert_eq!(
            model.evaluate(&[]).unwrap_err(),
            PipelineError::EmptyDataset("evaluate")
        );
    }
}
