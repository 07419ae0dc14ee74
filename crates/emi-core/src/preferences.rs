//! Selected display currency.
//!
//! The formatter never reads this; callers resolve the stored code to a
//! descriptor and pass it explicitly.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::currency::{currency_or_default, CurrencyDescriptor};
use crate::EmiCoreResult;

pub trait PreferenceStore {
    /// Stored currency code, if one was ever set.
    fn selected_currency_code(&self) -> EmiCoreResult<Option<String>>;

    fn set_selected_currency_code(&mut self, code: &str) -> EmiCoreResult<()>;
}

/// Resolve the stored currency, falling back to the catalog default when the
/// code is missing or unknown.
pub fn resolve_currency<S: PreferenceStore + ?Sized>(
    store: &S,
) -> EmiCoreResult<&'static CurrencyDescriptor> {
    let code = store.selected_currency_code()?.unwrap_or_default();
    Ok(currency_or_default(&code))
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryPreferenceStore {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    currency_code: Option<String>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn selected_currency_code(&self) -> EmiCoreResult<Option<String>> {
        Ok(self.currency_code.clone())
    }

    fn set_selected_currency_code(&mut self, code: &str) -> EmiCoreResult<()> {
        debug!(code, "selected currency updated");
        self.currency_code = Some(code.trim().to_ascii_uppercase());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_resolves_to_default() {
        let store = MemoryPreferenceStore::new();
        assert_eq!(store.selected_currency_code().unwrap(), None);
        assert_eq!(resolve_currency(&store).unwrap().code, "INR");
    }

    #[test]
    fn test_set_and_resolve() {
        let mut store = MemoryPreferenceStore::new();
        store.set_selected_currency_code("gbp").unwrap();
        assert_eq!(store.selected_currency_code().unwrap().as_deref(), Some("GBP"));
        assert_eq!(resolve_currency(&store).unwrap().symbol, "£");
    }

    #[test]
    fn test_unknown_code_is_kept_but_resolves_to_default() {
        let mut store = MemoryPreferenceStore::new();
        store.set_selected_currency_code("XYZ").unwrap();
        assert_eq!(store.selected_currency_code().unwrap().as_deref(), Some("XYZ"));
        assert_eq!(resolve_currency(&store).unwrap().code, "INR");
    }
}
