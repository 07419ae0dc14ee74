//! JSON-file persistence for calculation history and the selected currency.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use emi_core::history::{CalculationRecord, HistoryStore, MemoryHistoryStore};
use emi_core::preferences::{MemoryPreferenceStore, PreferenceStore};
use emi_core::{EmiCoreResult, EmiError};

pub const HISTORY_FILE: &str = "history.json";
pub const PREFERENCES_FILE: &str = "preferences.json";

/// History persisted as a single JSON document, rewritten on every change.
pub struct FileHistoryStore {
    path: PathBuf,
    inner: MemoryHistoryStore,
}

impl FileHistoryStore {
    pub fn open(data_dir: &Path) -> EmiCoreResult<Self> {
        let path = data_dir.join(HISTORY_FILE);
        let inner = load_or_default(&path)?;
        Ok(Self { path, inner })
    }

    fn persist(&self) -> EmiCoreResult<()> {
        save(&self.path, &self.inner)
    }
}

impl HistoryStore for FileHistoryStore {
    fn append(&mut self, record: CalculationRecord) -> EmiCoreResult<u64> {
        let id = self.inner.append(record)?;
        self.persist()?;
        Ok(id)
    }

    fn list(&self) -> EmiCoreResult<Vec<CalculationRecord>> {
        self.inner.list()
    }

    fn get(&self, id: u64) -> EmiCoreResult<Option<CalculationRecord>> {
        self.inner.get(id)
    }

    fn delete(&mut self, id: u64) -> EmiCoreResult<bool> {
        let removed = self.inner.delete(id)?;
        if removed {
            self.persist()?;
        }
        Ok(removed)
    }

    fn clear(&mut self) -> EmiCoreResult<()> {
        self.inner.clear()?;
        self.persist()
    }

    fn count(&self) -> EmiCoreResult<usize> {
        self.inner.count()
    }
}

/// Selected currency persisted as a small JSON document.
pub struct FilePreferenceStore {
    path: PathBuf,
    inner: MemoryPreferenceStore,
}

impl FilePreferenceStore {
    pub fn open(data_dir: &Path) -> EmiCoreResult<Self> {
        let path = data_dir.join(PREFERENCES_FILE);
        let inner = load_or_default(&path)?;
        Ok(Self { path, inner })
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn selected_currency_code(&self) -> EmiCoreResult<Option<String>> {
        self.inner.selected_currency_code()
    }

    fn set_selected_currency_code(&mut self, code: &str) -> EmiCoreResult<()> {
        self.inner.set_selected_currency_code(code)?;
        save(&self.path, &self.inner)
    }
}

fn load_or_default<T: DeserializeOwned + Default>(path: &Path) -> EmiCoreResult<T> {
    if !path.exists() {
        return Ok(T::default());
    }
    let contents = fs::read_to_string(path)
        .map_err(|e| EmiError::Storage(format!("Failed to read '{}': {}", path.display(), e)))?;
    if contents.trim().is_empty() {
        return Ok(T::default());
    }
    Ok(serde_json::from_str(&contents)?)
}

fn save<T: Serialize>(path: &Path, value: &T) -> EmiCoreResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            EmiError::Storage(format!("Failed to create '{}': {}", parent.display(), e))
        })?;
    }
    let contents = serde_json::to_string_pretty(value)?;
    fs::write(path, contents)
        .map_err(|e| EmiError::Storage(format!("Failed to write '{}': {}", path.display(), e)))?;
    debug!(path = %path.display(), "store saved");
    Ok(())
}
