use std::fmt;

use chrono::NaiveDate;
use log::{debug, warn};

use crate::error::{ConversionError, Result};
use crate::rate_lookup::RateLookup;

/// Amount converted for every day of a report unless overridden.
pub const DEFAULT_NOTIONAL: f64 = 100.0;

const REPORT_HEADER: &str = "Conversion Report:";

/// Converts amounts between currencies at rates supplied by `L`.
pub struct Converter<L> {
    lookup: L,
    notional: f64,
}

/// Notional converted on a single day.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportEntry {
    pub date: NaiveDate,
    pub amount: f64,
}

/// Converted notional amounts, one per day, in date order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConversionReport {
    pub entries: Vec<ReportEntry>,
}

impl ConversionReport {
    pub fn amounts(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.iter().map(|entry| entry.amount)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for ConversionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", REPORT_HEADER)?;
        for (i, amount) in self.amounts().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            f.write_str(&format_amount(amount))?;
        }
        Ok(())
    }
}

/// Shortest round-trip rendering, switching to exponent form outside
/// `1e-6..1e21` (`1e+22`, `1.5e-7`).
fn format_amount(amount: f64) -> String {
    if amount == 0.0 {
        return "0".to_string();
    }
    if amount.is_infinite() {
        return if amount > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let magnitude = amount.abs();
    if amount.is_nan() || (1e-6..1e21).contains(&magnitude) {
        return amount.to_string();
    }

    let exponent = format!("{:e}", amount);
    match exponent.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{}e+{}", mantissa, power),
        _ => exponent,
    }
}

impl<L: RateLookup> Converter<L> {
    pub fn new(lookup: L) -> Self {
        Self {
            lookup,
            notional: DEFAULT_NOTIONAL,
        }
    }

    pub fn with_notional(mut self, notional: f64) -> Self {
        self.notional = notional;
        self
    }

    pub fn notional(&self) -> f64 {
        self.notional
    }

    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    pub fn convert(&self, amount: f64, from_currency: &str, to_currency: &str) -> Result<f64> {
        validate_amount(amount)?;
        let rate = self.exchange_rate(from_currency, to_currency)?;
        let converted = amount * rate;
        debug!(
            "Converted {} {} to {} {} at rate {}",
            amount, from_currency, converted, to_currency, rate
        );

        Ok(converted)
    }

    pub fn generate_conversion_report(
        &self,
        from_currency: &str,
        to_currency: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<String> {
        let report = self.conversion_report(from_currency, to_currency, start_date, end_date)?;
        Ok(report.to_string())
    }

    /// Converts the notional at a freshly looked up rate for every day in
    /// `start_date..=end_date`. The first failure aborts the whole report.
    pub fn conversion_report(
        &self,
        from_currency: &str,
        to_currency: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<ConversionReport> {
        let mut report = ConversionReport::default();
        let mut current_date = start_date;

        while current_date <= end_date {
            let rate = self.exchange_rate(from_currency, to_currency)?;
            let amount = self.notional * rate;
            debug!("Report {}: {} {}", current_date, amount, to_currency);
            report.entries.push(ReportEntry {
                date: current_date,
                amount,
            });

            current_date = match current_date.succ_opt() {
                Some(next) => next,
                None => break,
            };
        }

        Ok(report)
    }

    fn exchange_rate(&self, from_currency: &str, to_currency: &str) -> Result<f64> {
        let rate = self
            .lookup
            .get_exchange_rate(from_currency, to_currency)
            .map_err(ConversionError::from_lookup)?;
        validate_exchange_rate(rate).inspect_err(|err| {
            warn!("Rejected rate {} for {}/{}: {}", rate, from_currency, to_currency, err)
        })?;

        Ok(rate)
    }
}

fn validate_amount(amount: f64) -> Result<()> {
    if amount.is_nan() {
        return Err(ConversionError::InvalidAmountInput);
    }

    Ok(())
}

// Zero and NaN both count as a missing rate and are checked first, so a
// genuine zero rate reads as a failed fetch.
fn validate_exchange_rate(rate: f64) -> Result<()> {
    if rate == 0.0 || rate.is_nan() {
        return Err(ConversionError::UnableToFetchExchangeRate);
    }

    if rate.is_nan() {
        return Err(ConversionError::InvalidExchangeRate);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn fixed(rate: f64) -> impl Fn(&str, &str) -> anyhow::Result<f64> {
        move |_: &str, _: &str| Ok(rate)
    }

    #[test]
    fn amount_is_checked_before_lookup() {
        let calls = Cell::new(0);
        let converter = Converter::new(|_: &str, _: &str| -> anyhow::Result<f64> {
            calls.set(calls.get() + 1);
            Ok(2.0)
        });

        let err = converter.convert(f64::NAN, "HUF", "USD").unwrap_err();

        assert!(matches!(err, ConversionError::InvalidAmountInput));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn negative_zero_rate_is_unable_to_fetch() {
        let converter = Converter::new(fixed(-0.0));
        let err = converter.convert(10.0, "HUF", "USD").unwrap_err();
        assert!(matches!(err, ConversionError::UnableToFetchExchangeRate));
    }

    #[test]
    fn infinite_values_pass_validation() {
        let converter = Converter::new(fixed(f64::INFINITY));
        assert_eq!(converter.convert(1.0, "A", "B").unwrap(), f64::INFINITY);
    }

    #[test]
    fn result_is_not_rounded() {
        let converter = Converter::new(fixed(0.1));
        assert_eq!(converter.convert(3.0, "A", "B").unwrap(), 3.0 * 0.1);
    }

    #[test]
    fn report_entries_carry_their_dates() {
        let converter = Converter::new(fixed(1.5)).with_notional(10.0);
        let start = NaiveDate::from_ymd_opt(2024, 2, 28).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        let report = converter.conversion_report("EUR", "USD", start, end).unwrap();

        let dates: Vec<_> = report.entries.iter().map(|e| e.date.to_string()).collect();
        assert_eq!(dates, ["2024-02-28", "2024-02-29", "2024-03-01"]);
        assert!(report.amounts().all(|amount| amount == 15.0));
    }

    #[test]
    fn report_stops_at_last_representable_day() {
        let converter = Converter::new(fixed(1.0));
        let report = converter
            .conversion_report("A", "B", NaiveDate::MAX, NaiveDate::MAX)
            .unwrap();
        assert_eq!(report.len(), 1);
    }

    #[test]
    fn empty_report_renders_header_only() {
        assert_eq!(ConversionReport::default().to_string(), "Conversion Report:\n");
    }

    #[test]
    fn nan_rate_is_unable_to_fetch() {
        let converter = Converter::new(fixed(f64::NAN));
        let err = converter.convert(10.0, "HUF", "USD").unwrap_err();
        assert!(matches!(err, ConversionError::UnableToFetchExchangeRate));
        assert_eq!(err.to_string(), "Unable to fetch exchange rate.");
    }

    #[test]
    fn amounts_switch_to_exponent_form_at_the_extremes() {
        assert_eq!(format_amount(200.0), "200");
        assert_eq!(format_amount(0.000001), "0.000001");
        assert_eq!(format_amount(1e22), "1e+22");
        assert_eq!(format_amount(-2.5e21), "-2.5e+21");
        assert_eq!(format_amount(1.5e-7), "1.5e-7");
        assert_eq!(format_amount(-0.0), "0");
        assert_eq!(format_amount(f64::INFINITY), "Infinity");
        assert_eq!(format_amount(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(format_amount(f64::NAN), "NaN");
    }

    #[test]
    fn huge_report_values_use_exponent_form() {
        let converter = Converter::new(fixed(1e20));
        let report = converter
            .generate_conversion_report("A", "B", NaiveDate::MIN, NaiveDate::MIN)
            .unwrap();
        assert_eq!(report, "Conversion Report:\n1e+22");
    }
}
