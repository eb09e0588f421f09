use fareml_data::{NumericColumn, TaxiTrip, TripPrediction};
use fareml_metrics::RegressionMetrics;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::PipelineConfig;
use crate::error::PipelineResult;
use crate::pipeline::{Estimator, FittedModel, Trainer};

/// The three independently trained taxi models.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxiModels<E> {
    pub fare: FittedModel<E>,
    pub trip_time: FittedModel<E>,
    pub consumption: FittedModel<E>,
}

/// Metrics of each taxi model on one dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelEvaluation {
    pub fare: RegressionMetrics,
    pub trip_time: RegressionMetrics,
    pub consumption: RegressionMetrics,
}

impl ModelEvaluation {
    /// Metrics keyed by label, in report order.
    pub fn by_label(&self) -> [(NumericColumn, RegressionMetrics); 3] {
        [
            (NumericColumn::FareAmount, self.fare),
            (NumericColumn::TripTime, self.trip_time),
            (NumericColumn::Consumption, self.consumption),
        ]
    }
}

impl<E: Estimator> TaxiModels<E> {
    /// Train the fare, trip-time and consumption models on the same trips.
    pub fn train<Tr>(trainer: &Tr, trips: &[TaxiTrip]) -> PipelineResult<Self>
    where
        Tr: Trainer<Estimator = E>,
    {
        let fare = trainer.fit(trips, &PipelineConfig::fare())?;
        let trip_time = trainer.fit(trips, &PipelineConfig::trip_time())?;
        let consumption = trainer.fit(trips, &PipelineConfig::consumption())?;
        info!(rows = trips.len(), "trained taxi models");
        Ok(TaxiModels {
            fare,
            trip_time,
            consumption,
        })
    }

    pub fn evaluate(&self, trips: &[TaxiTrip]) -> PipelineResult<ModelEvaluation> {
        Ok(ModelEvaluation {
            fare: self.fare.evaluate(trips)?,
            trip_time: self.trip_time.evaluate(trips)?,
            consumption: self.consumption.evaluate(trips)?,
        })
    }

    /// One prediction per trip from every model, in input order.
    pub fn predict(&self, trips: &[TaxiTrip]) -> PipelineResult<Vec<TripPrediction>> {
        trips
            .iter()
            .map(|trip| {
                Ok(TripPrediction {
                    fare_amount: self.fare.predict(trip)?,
                    trip_time: self.trip_time.predict(trip)?,
                    consumption: self.consumption.predict(trip)?,
                })
            })
            .collect()
    }

    /// Models paired with the file stem they are saved under.
    pub fn named(&self) -> [(&'static str, &FittedModel<E>); 3] {
        [
            ("fare_model", &self.fare),
            ("trip_time_model", &self.trip_time),
            ("consumption_model", &self.consumption),
        ]
    }
}
