use fareml_data::{CategoricalColumn, NumericColumn};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{PipelineError, PipelineResult};

/// One input to the concatenated feature vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureColumn {
    /// One-hot encoded into one indicator per observed category.
    Categorical(CategoricalColumn),
    /// Passed through as a single float.
    Numeric(NumericColumn),
}

impl FeatureColumn {
    pub fn name(self) -> &'static str {
        match self {
            FeatureColumn::Categorical(c) => c.name(),
            FeatureColumn::Numeric(c) => c.name(),
        }
    }
}

impl fmt::Display for FeatureColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<CategoricalColumn> for FeatureColumn {
    fn from(c: CategoricalColumn) -> Self {
        FeatureColumn::Categorical(c)
    }
}

impl From<NumericColumn> for FeatureColumn {
    fn from(c: NumericColumn) -> Self {
        FeatureColumn::Numeric(c)
    }
}

/// Which column a model predicts and which columns it reads, in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub label: NumericColumn,
    pub features: Vec<FeatureColumn>,
}

impl PipelineConfig {
    pub fn new(label: NumericColumn, features: Vec<FeatureColumn>) -> Self {
        PipelineConfig { label, features }
    }

    /// Features shared by every taxi model.
    fn trip_features() -> Vec<FeatureColumn> {
        vec![
            CategoricalColumn::VendorId.into(),
            CategoricalColumn::RateCode.into(),
            NumericColumn::PassengerCount.into(),
            NumericColumn::TripDistance.into(),
            CategoricalColumn::PaymentType.into(),
        ]
    }

    /// Fare model: trip time is an input.
    pub fn fare() -> Self {
        let mut features = Self::trip_features();
        features.push(NumericColumn::TripTime.into());
        PipelineConfig::new(NumericColumn::FareAmount, features)
    }

    /// Trip-time model: trip time is the label, so it is not an input.
    pub fn trip_time() -> Self {
        PipelineConfig::new(NumericColumn::TripTime, Self::trip_features())
    }

    /// Consumption model: trip time is an input.
    pub fn consumption() -> Self {
        let mut features = Self::trip_features();
        features.push(NumericColumn::TripTime.into());
        PipelineConfig::new(NumericColumn::Consumption, features)
    }

    pub fn validate(&self) -> PipelineResult<()> {
        if self.features.is_empty() {
            return Err(PipelineError::NoFeatures(self.label));
        }
        if self.features.contains(&FeatureColumn::Numeric(self.label)) {
            return Err(PipelineError::LabelInFeatures(self.label));
        }
        Ok(())
    }
}
