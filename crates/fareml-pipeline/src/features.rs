use fareml_core::Tensor;
use fareml_data::{CategoricalColumn, NumericColumn, TaxiTrip};
use fareml_preprocessing::OneHotEncoder;
use serde::{Deserialize, Serialize};

use crate::config::FeatureColumn;
use crate::error::{PipelineError, PipelineResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
enum EncodedFeature {
    Categorical {
        column: CategoricalColumn,
        encoder: OneHotEncoder,
    },
    Numeric {
        column: NumericColumn,
    },
}

impl EncodedFeature {
    fn width(&self) -> usize {
        match self {
            EncodedFeature::Categorical { encoder, .. } => encoder.width(),
            EncodedFeature::Numeric { .. } => 1,
        }
    }
}

/// Fitted encode-and-concatenate step turning trips into a feature matrix.
///
/// Each categorical column gets its own one-hot encoder; numeric columns are
/// copied through. Blocks appear in the configured column order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureEncoder {
    features: Vec<EncodedFeature>,
}

impl FeatureEncoder {
    pub fn fit(trips: &[TaxiTrip], columns: &[FeatureColumn]) -> PipelineResult<Self> {
        if trips.is_empty() {
            return Err(PipelineError::EmptyDataset("fit feature encoder"));
        }
        let features = columns
            .iter()
            .map(|&column| match column {
                FeatureColumn::Categorical(column) => {
                    let values: Vec<&str> = trips.iter().map(|t| t.categorical(column)).collect();
                    let mut encoder = OneHotEncoder::new();
                    encoder.fit(&values);
                    EncodedFeature::Categorical { column, encoder }
                }
                FeatureColumn::Numeric(column) => EncodedFeature::Numeric { column },
            })
            .collect();
        Ok(FeatureEncoder { features })
    }

    /// Length of one encoded feature vector.
    pub fn width(&self) -> usize {
        self.features.iter().map(EncodedFeature::width).sum()
    }

    /// Names of the encoded slots, e.g. `VendorId=CMT` or `TripDistance`.
    pub fn feature_names(&self) -> Vec<String> {
        let mut names = Vec::with_capacity(self.width());
        for feature in &self.features {
            match feature {
                EncodedFeature::Categorical { column, encoder } => {
                    names.extend(encoder.categories().iter().map(|c| format!("{}={}", column, c)));
                }
                EncodedFeature::Numeric { column } => names.push(column.to_string()),
            }
        }
        names
    }

    /// Encode every trip into an `[n, width]` matrix.
    pub fn transform(&self, trips: &[TaxiTrip]) -> PipelineResult<Tensor<f64>> {
        let mut blocks = Vec::with_capacity(self.features.len());
        for feature in &self.features {
            let block = match feature {
                EncodedFeature::Categorical { column, encoder } => {
                    let values: Vec<&str> = trips.iter().map(|t| t.categorical(*column)).collect();
                    encoder.transform(&values)?
                }
                EncodedFeature::Numeric { column } => {
                    let values: Vec<f64> = trips.iter().map(|t| t.numeric(*column) as f64).collect();
                    Tensor::from_slice(&values).into_column()?
                }
            };
            blocks.push(block);
        }
        let refs: Vec<&Tensor<f64>> = blocks.iter().collect();
        Ok(Tensor::hstack(&refs)?)
    }

    /// Encode one trip into `out`, which is resized to `width()`.
    pub fn transform_row(&self, trip: &TaxiTrip, out: &mut Vec<f64>) {
        out.clear();
        out.resize(self.width(), 0.0);
        let mut offset = 0;
        for feature in &self.features {
            let width = feature.width();
            match feature {
                EncodedFeature::Categorical { column, encoder } => {
                    encoder.encode_into(trip.categorical(*column), &mut out[offset..offset + width]);
                }
                EncodedFeature::Numeric { column } => out[offset] = trip.numeric(*column) as f64,
            }
            offset += width;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;

    fn trip(vendor: &str, payment: &str, distance: f32, time: f32) -> TaxiTrip {
        TaxiTrip {
            vendor_id: vendor.into(),
            rate_code: "1".into(),
            passenger_count: 1.0,
            trip_time: time,
            trip_distance: distance,
            payment_type: payment.into(),
            fare_amount: 10.0,
            consumption: 0.3,
        }
    }

    fn trips() -> Vec<TaxiTrip> {
        vec![
            trip("VTS", "CRD", 2.0, 600.0),
            trip("CMT", "CSH", 0.5, 120.0),
            trip("VTS", "CSH", 8.0, 1500.0),
        ]
    }

    #[test]
    fn test_feature_layout() {
        let enc = FeatureEncoder::fit(&trips(), &PipelineConfig::fare().features).unwrap();
        assert_eq!(
            enc.feature_names(),
            vec![
                "VendorId=CMT", "VendorId=VTS", "RateCode=1", "PassengerCount",
                "TripDistance", "PaymentType=CRD", "PaymentType=CSH", "TripTime",
            ]
        );
        assert_eq!(enc.width(), 8);
    }

    #[test]
    fn test_transform_matrix() {
        let data = trips();
        let enc = FeatureEncoder::fit(&data, &PipelineConfig::trip_time().features).unwrap();
        let x = enc.transform(&data).unwrap();
        assert_eq!(x.shape_vec(), vec![3, 7]);
        assert_eq!(x.row(0).unwrap(), &[0.0, 1.0, 1.0, 1.0, 2.0, 1.0, 0.0]);
        assert_eq!(x.row(1).unwrap(), &[1.0, 0.0, 1.0, 1.0, 0.5, 0.0, 1.0]);
    }

    #[test]
    fn test_transform_row_matches_matrix() {
        let data = trips();
        let enc = FeatureEncoder::fit(&data, &PipelineConfig::consumption().features).unwrap();
        let x = enc.transform(&data).unwrap();
        let mut row = Vec::new();
        for (i, t) in data.iter().enumerate() {
            enc.transform_row(t, &mut row);
            assert_eq!(row.as_slice(), x.row(i).unwrap());
        }
    }

    #[test]
    fn test_unseen_category_encodes_to_zeros() {
        let enc = FeatureEncoder::fit(&trips(), &[CategoricalColumn::VendorId.into()]).unwrap();
        let mut row = Vec::new();
        enc.transform_row(&trip("DDS", "CRD", 1.0, 60.0), &mut row);
        assert_eq!(row, vec![0.0, 0.0]);
    }

    #[test]
    fn test_fit_empty() {
        assert_eq!(
            FeatureEncoder::fit(&[], &PipelineConfig::fare().features).unwrap_err(),
            PipelineError::EmptyDataset("fit feature encoder")
        );
    }
}
