use anyhow::Result;

/// Source of exchange rates for a currency pair.
///
/// Errors are opaque to the converter and are handed back to the caller
/// unchanged.
pub trait RateLookup {
    fn get_exchange_rate(&self, from_currency: &str, to_currency: &str) -> Result<f64>;
}

impl<F> RateLookup for F
where
    F: Fn(&str, &str) -> Result<f64>,
{
    fn get_exchange_rate(&self, from_currency: &str, to_currency: &str) -> Result<f64> {
        self(from_currency, to_currency)
    }
}
