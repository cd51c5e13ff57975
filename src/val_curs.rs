//! Offline exchange rates read from a saved CBR `XML_daily` document.
//!
//! Every `VunitRate` is the price of one unit of the currency in roubles, so
//! the rate between two listed currencies is the ratio of their unit rates.

use std::{collections::HashMap, fs, path::Path, str::FromStr};

use anyhow::{Context, Result, anyhow};
use log::debug;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use serde::Deserialize;
use serde::Serialize;

use crate::rate_lookup::RateLookup;

const BASE_CURRENCY: &str = "RUB";

#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct Valute {
    #[serde(rename = "CharCode")]
    pub char_code: String,
    #[serde(rename = "VunitRate")]
    pub vunit_rate: String,
}

#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct ValCurs {
    #[serde(rename = "@Date", default)]
    pub date: Option<String>,
    #[serde(rename = "Valute", default)]
    pub valute: Vec<Valute>,
}

impl ValCurs {
    pub fn from_xml(text: &str) -> Result<Self> {
        Ok(quick_xml::de::from_str(text)?)
    }
}

/// Rouble price of one unit of each listed currency.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    unit_rates: HashMap<String, Decimal>,
}

impl RateTable {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Can't read rates file {}", path.display()))?;
        let val_curs = ValCurs::from_xml(&text)
            .with_context(|| format!("Can't parse rates file {}", path.display()))?;
        let table = RateTable::try_from(&val_curs)?;
        debug!(
            "Loaded {} rates from {} ({})",
            table.unit_rates.len(),
            path.display(),
            val_curs.date.as_deref().unwrap_or("undated")
        );

        Ok(table)
    }

    pub fn unit_rate(&self, char_code: &str) -> Result<Decimal> {
        self.unit_rates
            .get(char_code)
            .copied()
            .ok_or_else(|| anyhow!("No rate for currency '{}'", char_code))
    }

    pub fn cross_rate(&self, from_currency: &str, to_currency: &str) -> Result<Decimal> {
        let from = self.unit_rate(from_currency)?;
        let to = self.unit_rate(to_currency)?;

        from.checked_div(to).ok_or_else(|| {
            anyhow!(
                "Can't compute rate {}/{} from {} and {}",
                from_currency,
                to_currency,
                from,
                to
            )
        })
    }
}

impl TryFrom<&ValCurs> for RateTable {
    type Error = anyhow::Error;

    fn try_from(val_curs: &ValCurs) -> Result<Self> {
        let mut unit_rates = HashMap::new();
        unit_rates.insert(BASE_CURRENCY.to_string(), Decimal::ONE);

        for valute in &val_curs.valute {
            let normalized_string = normalize_decimal_string(&valute.vunit_rate);
            let value = Decimal::from_str(&normalized_string).with_context(|| {
                format!("Bad VunitRate '{}' for {}", valute.vunit_rate, valute.char_code)
            })?;
            unit_rates.insert(valute.char_code.clone(), value);
        }

        Ok(Self { unit_rates })
    }
}

impl RateLookup for RateTable {
    fn get_exchange_rate(&self, from_currency: &str, to_currency: &str) -> Result<f64> {
        let rate = self.cross_rate(from_currency, to_currency)?;
        rate.to_f64()
            .ok_or_else(|| anyhow!("Rate {} doesn't fit into f64", rate))
    }
}

fn normalize_decimal_string(s: &str) -> String {
    s.trim().replace(',', ".")
}
