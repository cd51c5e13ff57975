use std::{env, path::PathBuf, str::FromStr};

use anyhow::{Context, Result, anyhow};

use crate::converter::DEFAULT_NOTIONAL;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub rates_file: PathBuf,
    pub from_currency: String,
    pub to_currency: String,
    pub amount: f64,
    pub notional: f64,
    pub report_days: u64,
}

impl Settings {
    /// Reads `VALUT_*` variables, picking up a `.env` file first if present.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let rates_file = var("VALUT_RATES_FILE")
            .map(PathBuf::from)
            .ok_or(anyhow!("VALUT_RATES_FILE is not set"))?;
        let report_days = parse_or(&var, "VALUT_REPORT_DAYS", 7)?;
        if report_days == 0 {
            anyhow::bail!("VALUT_REPORT_DAYS must be at least 1");
        }

        Ok(Self {
            rates_file,
            from_currency: var("VALUT_FROM").unwrap_or_else(|| "USD".to_string()),
            to_currency: var("VALUT_TO").unwrap_or_else(|| "RUB".to_string()),
            amount: parse_or(&var, "VALUT_AMOUNT", 1000.0)?,
            notional: parse_or(&var, "VALUT_NOTIONAL", DEFAULT_NOTIONAL)?,
            report_days,
        })
    }
}

fn parse_or<T>(var: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match var(key) {
        Some(value) => value
            .trim()
            .parse()
            .with_context(|| format!("Can't parse {}={}", key, value)),
        None => Ok(default),
    }
}
