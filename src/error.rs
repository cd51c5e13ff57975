use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("Invalid amount input.")]
    InvalidAmountInput,

    #[error("Unable to fetch exchange rate.")]
    UnableToFetchExchangeRate,

    #[error("Invalid exchange rate.")]
    InvalidExchangeRate,

    /// Failure raised by the rate lookup itself, passed through as is.
    #[error(transparent)]
    RateLookup(#[from] anyhow::Error),
}

impl ConversionError {
    /// Keeps a `ConversionError` raised by the lookup as is; anything else
    /// becomes `RateLookup`.
    pub fn from_lookup(err: anyhow::Error) -> Self {
        match err.downcast::<ConversionError>() {
            Ok(err) => err,
            Err(err) => ConversionError::RateLookup(err),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConversionError>;
