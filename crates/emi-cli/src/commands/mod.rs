pub mod currency;
pub mod format;
pub mod history;
pub mod loan;

use tracing::warn;

use emi_core::currency::{currency_or_default, find_currency, CurrencyDescriptor};
use emi_core::preferences::PreferenceStore;

use crate::config::CliConfig;
use crate::error::CliResult;
use crate::store::{FileHistoryStore, FilePreferenceStore};

/// Shared state handed to every command.
pub struct Context {
    pub config: CliConfig,
}

impl Context {
    pub fn new(config: CliConfig) -> Self {
        Self { config }
    }

    pub fn history_store(&self) -> CliResult<FileHistoryStore> {
        Ok(FileHistoryStore::open(&self.config.data_dir()?)?)
    }

    pub fn preference_store(&self) -> CliResult<FilePreferenceStore> {
        Ok(FilePreferenceStore::open(&self.config.data_dir()?)?)
    }

    /// Display currency for this invocation: the flag, else the saved
    /// preference, else the configured default. Unknown codes fall back to
    /// the catalog default.
    pub fn display_currency(&self, flag: Option<&str>) -> CliResult<&'static CurrencyDescriptor> {
        let (code, source) = match flag {
            Some(code) => (code.to_string(), "flag"),
            None => match self.preference_store()?.selected_currency_code()? {
                Some(code) => (code, "preference"),
                None => (self.config.default_currency.clone(), "config"),
            },
        };
        Ok(lookup_with_fallback(&code, source))
    }
}

fn lookup_with_fallback(code: &str, source: &str) -> &'static CurrencyDescriptor {
    if find_currency(code).is_none() {
        warn!(code, source, "unknown currency code, using default");
    }
    currency_or_default(code)
}
