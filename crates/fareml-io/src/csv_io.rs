use fareml_data::{NumericColumn, TaxiTrip, TripDataset, TripPrediction};
use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::debug;

use crate::error::{IoError, IoResult};

/// Fewest columns an input row may have.
pub const MIN_INPUT_COLUMNS: usize = TaxiTrip::FIELD_COUNT;
/// Most columns an input row may have; trailing prediction columns are ignored.
pub const MAX_INPUT_COLUMNS: usize = TaxiTrip::FIELD_COUNT + TripPrediction::FIELD_COUNT;

/// Header of every predictions file.
pub const PREDICTION_HEADER: [&str; MAX_INPUT_COLUMNS] = [
    "VendorId",
    "RateCode",
    "PassengerCount",
    "TripTime",
    "TripDistance",
    "PaymentType",
    "FareAmount",
    "Consumption",
    "PredictedFareAmount",
    "PredictedTripTime",
    "PredictedConsumption",
];

/// Read a comma-delimited trip file. The header row is skipped; columns
/// are matched by position, not by header name.
pub fn read_trips<P: AsRef<Path>>(path: P) -> IoResult<TripDataset> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| IoError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let dataset = read_trips_from(file)?;
    debug!(path = %path.display(), rows = dataset.len(), "loaded trips");
    Ok(dataset)
}

/// Read trips from any reader holding CSV text with a header row.
pub fn read_trips_from<R: Read>(reader: R) -> IoResult<TripDataset> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(b',')
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut trips = Vec::new();
    for result in rdr.records() {
        let record = result?;
        trips.push(parse_trip(&record)?);
    }
    Ok(TripDataset::new(trips))
}

fn parse_trip(record: &StringRecord) -> IoResult<TaxiTrip> {
    let line = record.position().map_or(0, |p| p.line());
    if record.len() < MIN_INPUT_COLUMNS || record.len() > MAX_INPUT_COLUMNS {
        return Err(IoError::ColumnCount {
            line,
            min: MIN_INPUT_COLUMNS,
            max: MAX_INPUT_COLUMNS,
            got: record.len(),
        });
    }

    let numeric = |idx: usize, column: NumericColumn| -> IoResult<f32> {
        let raw = &record[idx];
        match raw.parse::<f32>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(IoError::Parse {
                line,
                column: column.name(),
                value: raw.to_string(),
            }),
        }
    };

    Ok(TaxiTrip {
        vendor_id: record[0].to_string(),
        rate_code: record[1].to_string(),
        passenger_count: numeric(2, NumericColumn::PassengerCount)?,
        trip_time: numeric(3, NumericColumn::TripTime)?,
        trip_distance: numeric(4, NumericColumn::TripDistance)?,
        payment_type: record[5].to_string(),
        fare_amount: numeric(6, NumericColumn::FareAmount)?,
        consumption: numeric(7, NumericColumn::Consumption)?,
    })
}

/// Write every trip with its predictions to `path`, replacing any existing file.
pub fn write_predictions<P: AsRef<Path>>(
    path: P,
    trips: &[TaxiTrip],
    predictions: &[TripPrediction],
) -> IoResult<()> {
    let path = path.as_ref();
    if trips.len() != predictions.len() {
        return Err(IoError::LengthMismatch {
            trips: trips.len(),
            predictions: predictions.len(),
        });
    }
    let file = File::create(path).map_err(|source| IoError::Create {
        path: path.to_path_buf(),
        source,
    })?;
    write_predictions_to(file, trips, predictions)?;
    debug!(path = %path.display(), rows = trips.len(), "wrote predictions");
    Ok(())
}

/// Write the predictions CSV (header plus one row per trip) to `writer`.
pub fn write_predictions_to<W: Write>(
    writer: W,
    trips: &[TaxiTrip],
    predictions: &[TripPrediction],
) -> IoResult<()> {
    if trips.len() != predictions.len() {
        return Err(IoError::LengthMismatch {
            trips: trips.len(),
            predictions: predictions.len(),
        });
    }

    let mut wtr = WriterBuilder::new()
        .has_headers(false)
        .delimiter(b',')
        .from_writer(writer);
    wtr.write_record(PREDICTION_HEADER)?;

    for (trip, prediction) in trips.iter().zip(predictions) {
        wtr.write_record(trip.fields().iter().chain(prediction.fields().iter()))?;
    }

    wtr.flush()?;
    Ok(())
}
