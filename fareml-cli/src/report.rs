use fareml::pipeline::ModelEvaluation;
use std::io::{self, Write};

/// Round to two decimals and drop trailing zeros: `0.9`, `1`, `12.35`.
pub fn format_metric(value: f64) -> String {
    let mut s = format!("{:.2}", value);
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').trim_end_matches('.').len();
        s.truncate(trimmed);
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s
}

/// Like [`format_metric`] but without a leading integer zero: `.5`, `12.35`,
/// and an empty string for zero.
pub fn format_metric_no_leading_zero(value: f64) -> String {
    let s = format_metric(value);
    if s == "0" {
        String::new()
    } else if let Some(frac) = s.strip_prefix("0.") {
        format!(".{}", frac)
    } else if let Some(frac) = s.strip_prefix("-0.") {
        format!("-.{}", frac)
    } else {
        s
    }
}

/// Print the model quality block for all three models. R² keeps its leading
/// zero; RMSE drops it.
pub fn print_report<W: Write>(out: &mut W, evaluation: &ModelEvaluation) -> io::Result<()> {
    writeln!(out, "*************************************************")?;
    writeln!(out, "*       Model quality metrics evaluation         ")?;
    writeln!(out, "*------------------------------------------------")?;
    for (label, metrics) in evaluation.by_label() {
        writeln!(out, "*       RSquared Score ({}): {}", label, format_metric(metrics.r2))?;
        writeln!(
            out,
            "*       Root Mean Squared Error ({}): {}",
            label,
            format_metric_no_leading_zero(metrics.rmse)
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fareml::metrics::RegressionMetrics;

    fn metrics(r2: f64, rmse: f64) -> RegressionMetrics {
        RegressionMetrics { mae: 0.0, mse: rmse * rmse, rmse, r2 }
    }

    #[test]
    fn test_format_metric() {
        assert_eq!(format_metric(0.9), "0.9");
        assert_eq!(format_metric(1.0), "1");
        assert_eq!(format_metric(12.3456), "12.35");
        assert_eq!(format_metric(3.14159), "3.14");
        assert_eq!(format_metric(0.004), "0");
        assert_eq!(format_metric(-0.001), "0");
        assert_eq!(format_metric(-0.5), "-0.5");
        assert_eq!(format_metric(250.0), "250");
    }

    #[test]
    fn test_format_metric_no_leading_zero() {
        assert_eq!(format_metric_no_leading_zero(0.5), ".5");
        assert_eq!(format_metric_no_leading_zero(0.0), "");
        assert_eq!(format_metric_no_leading_zero(0.004), "");
        assert_eq!(format_metric_no_leading_zero(0.126), ".13");
        assert_eq!(format_metric_no_leading_zero(1.0), "1");
        assert_eq!(format_metric_no_leading_zero(12.3456), "12.35");
        assert_eq!(format_metric_no_leading_zero(-0.25), "-.25");
    }

    #[test]
    fn test_report_layout() {
        let evaluation = ModelEvaluation {
            fare: metrics(0.9, 3.5),
            trip_time: metrics(0.75, 420.123),
            consumption: metrics(0.5, 0.1),
        };
        let mut out = Vec::new();
        print_report(&mut out, &evaluation).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 9);
        assert_eq!(lines[3], "*       RSquared Score (FareAmount): 0.9");
        assert_eq!(lines[4], "*       Root Mean Squared Error (FareAmount): 3.5");
        assert_eq!(lines[5], "*       RSquared Score (TripTime): 0.75");
        assert_eq!(lines[6], "*       Root Mean Squared Error (TripTime): 420.12");
        assert_eq!(lines[7], "*       RSquared Score (Consumption): 0.5");
        assert_eq!(lines[8], "*       Root Mean Squared Error (Consumption): .1");
    }

    #[test]
    fn test_report_zero_rmse_is_blank() {
        let evaluation = ModelEvaluation {
            fare: metrics(0.0, 0.0),
            trip_time: metrics(1.0, 0.0),
            consumption: metrics(0.5, 0.0),
        };
        let mut out = Vec::new();
        print_report(&mut out, &evaluation).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[3], "*       RSquared Score (FareAmount): 0");
        assert_eq!(lines[4], "*       Root Mean Squared Error (FareAmount): ");
    }
}
