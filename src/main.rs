use anyhow::Result;
use chrono::{Days, NaiveDate, Utc};
use log::info;
use valut::{Converter, RateTable, settings::Settings};

fn main() -> Result<()> {
    env_logger::init();

    let settings = Settings::from_env()?;
    let table = RateTable::load(&settings.rates_file)?;
    let converter = Converter::new(table).with_notional(settings.notional);

    let converted = converter.convert(
        settings.amount,
        &settings.from_currency,
        &settings.to_currency,
    )?;
    println!(
        "{} {} = {} {}",
        settings.amount, settings.from_currency, converted, settings.to_currency
    );

    let (start_date, end_date) = report_window(settings.report_days)?;
    info!("Generating report for {} - {}", start_date, end_date);
    let report = converter.generate_conversion_report(
        &settings.from_currency,
        &settings.to_currency,
        start_date,
        end_date,
    )?;
    println!("{}", report);

    Ok(())
}

fn report_window(days: u64) -> Result<(NaiveDate, NaiveDate)> {
    let today = Utc::now().date_naive();
    let start_date = today
        .checked_sub_days(Days::new(days.saturating_sub(1)))
        .ok_or(anyhow::anyhow!("Can't get previous date for {}", today))?;

    Ok((start_date, today))
}
