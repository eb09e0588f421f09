use serde::{Deserialize, Serialize};
use std::fmt;

/// A string-valued column that is one-hot encoded before training.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoricalColumn {
    VendorId,
    RateCode,
    PaymentType,
}

impl CategoricalColumn {
    /// CSV header name.
    pub fn name(self) -> &'static str {
        match self {
            CategoricalColumn::VendorId => "VendorId",
            CategoricalColumn::RateCode => "RateCode",
            CategoricalColumn::PaymentType => "PaymentType",
        }
    }
}

/// A float-valued column, usable as predictor or label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumericColumn {
    PassengerCount,
    TripTime,
    TripDistance,
    FareAmount,
    Consumption,
}

impl NumericColumn {
    /// CSV header name.
    pub fn name(self) -> &'static str {
        match self {
            NumericColumn::PassengerCount => "PassengerCount",
            NumericColumn::TripTime => "TripTime",
            NumericColumn::TripDistance => "TripDistance",
            NumericColumn::FareAmount => "FareAmount",
            NumericColumn::Consumption => "Consumption",
        }
    }
}

impl fmt::Display for CategoricalColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for NumericColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One taxi trip as loaded from the input CSV.
///
/// Field order matches the positional file layout.
#[derive(Debug, Clone, PartialEq)]
pub struct TaxiTrip {
    pub vendor_id: String,
    pub rate_code: String,
    pub passenger_count: f32,
    pub trip_time: f32,
    pub trip_distance: f32,
    pub payment_type: String,
    pub fare_amount: f32,
    pub consumption: f32,
}

impl TaxiTrip {
    /// Number of input fields parsed per row.
    pub const FIELD_COUNT: usize = 8;

    pub fn categorical(&self, column: CategoricalColumn) -> &str {
        match column {
            CategoricalColumn::VendorId => &self.vendor_id,
            CategoricalColumn::RateCode => &self.rate_code,
            CategoricalColumn::PaymentType => &self.payment_type,
        }
    }

    pub fn numeric(&self, column: NumericColumn) -> f32 {
        match column {
            NumericColumn::PassengerCount => self.passenger_count,
            NumericColumn::TripTime => self.trip_time,
            NumericColumn::TripDistance => self.trip_distance,
            NumericColumn::FareAmount => self.fare_amount,
            NumericColumn::Consumption => self.consumption,
        }
    }

    /// The input fields as text, in file order.
    pub fn fields(&self) -> [String; TaxiTrip::FIELD_COUNT] {
        [
            self.vendor_id.clone(),
            self.rate_code.clone(),
            self.passenger_count.to_string(),
            self.trip_time.to_string(),
            self.trip_distance.to_string(),
            self.payment_type.clone(),
            self.fare_amount.to_string(),
            self.consumption.to_string(),
        ]
    }
}

/// Model outputs for one trip, joined to its `TaxiTrip` by row index.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TripPrediction {
    pub fare_amount: f32,
    pub trip_time: f32,
    pub consumption: f32,
}

impl TripPrediction {
    pub const FIELD_COUNT: usize = 3;

    pub fn fields(&self) -> [String; TripPrediction::FIELD_COUNT] {
        [
            self.fare_amount.to_string(),
            self.trip_time.to_string(),
            self.consumption.to_string(),
        ]
    }
}
