pub mod amortization;
pub mod currency;
pub mod error;
pub mod format;
pub mod input;
pub mod types;

#[cfg(feature = "history")]
pub mod history;

#[cfg(feature = "history")]
pub mod preferences;

pub use amortization::{analyze, compute};
pub use currency::{currency_or_default, find_currency, CurrencyDescriptor, NumberingScheme};
pub use error::EmiError;
pub use format::{format_amount, format_compact, format_currency};
pub use types::*;

/// Standard result type for all EMI operations
pub type EmiCoreResult<T> = Result<T, EmiError>;
