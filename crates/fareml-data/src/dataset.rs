use fareml_core::Tensor;
use crate::trip::{NumericColumn, TaxiTrip};

/// An ordered, immutable collection of trips loaded from one file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TripDataset {
    trips: Vec<TaxiTrip>,
}

impl TripDataset {
    pub fn new(trips: Vec<TaxiTrip>) -> Self {
        TripDataset { trips }
    }

    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&TaxiTrip> {
        self.trips.get(idx)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TaxiTrip> {
        self.trips.iter()
    }

    pub fn trips(&self) -> &[TaxiTrip] {
        &self.trips
    }
}

/// Values of `column` for every trip in `trips`, widened to `f64`.
pub fn labels(trips: &[TaxiTrip], column: NumericColumn) -> Tensor<f64> {
    let data: Vec<f64> = trips.iter().map(|t| t.numeric(column) as f64).collect();
    Tensor::from_slice(&data)
}

impl From<Vec<TaxiTrip>> for TripDataset {
    fn from(trips: Vec<TaxiTrip>) -> Self {
        TripDataset::new(trips)
    }
}

impl<'a> IntoIterator for &'a TripDataset {
    type Item = &'a TaxiTrip;
    type IntoIter = std::slice::Iter<'a, TaxiTrip>;

    fn into_iter(self) -> Self::IntoIter {
        self.trips.iter()
    }
}
