//! Calculation history.
//!
//! The engine never touches history itself. Callers derive a
//! [`CalculationRecord`] from a finished computation and hand it to a
//! [`HistoryStore`]. [`MemoryHistoryStore`] is the reference implementation and
//! is also the serialisable snapshot that file-backed stores persist.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::amortization::{EmiResult, LoanInput};
use crate::types::{Money, Percent};
use crate::EmiCoreResult;

/// Id carried by a record that has not been stored yet.
pub const UNASSIGNED_ID: u64 = 0;

/// One saved calculation, without its schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRecord {
    pub id: u64,
    pub loan_amount: Money,
    /// Annual rate in percent.
    pub interest_rate: Percent,
    pub tenure_months: u32,
    pub emi_amount: Money,
    pub total_interest: Money,
    pub total_payable: Money,
    pub timestamp: DateTime<Utc>,
}

impl CalculationRecord {
    /// Build an unsaved record from the inputs and output of a computation.
    pub fn from_result(input: &LoanInput, result: &EmiResult, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: UNASSIGNED_ID,
            loan_amount: input.principal,
            interest_rate: input.annual_rate_percent,
            tenure_months: input.tenure_months,
            emi_amount: result.emi_amount,
            total_interest: result.total_interest,
            total_payable: result.total_payable,
            timestamp,
        }
    }
}

/// Append/list/delete/count access to saved calculations.
pub trait HistoryStore {
    /// Store a record and return its id.
    ///
    /// A record with [`UNASSIGNED_ID`] gets a fresh id. A record whose id is
    /// already present replaces the stored one.
    fn append(&mut self, record: CalculationRecord) -> EmiCoreResult<u64>;

    /// All records, newest first.
    fn list(&self) -> EmiCoreResult<Vec<CalculationRecord>>;

    /// The `limit` newest records.
    fn recent(&self, limit: usize) -> EmiCoreResult<Vec<CalculationRecord>> {
        let mut records = self.list()?;
        records.truncate(limit);
        Ok(records)
    }

    fn get(&self, id: u64) -> EmiCoreResult<Option<CalculationRecord>>;

    /// Remove one record. Returns whether it existed.
    fn delete(&mut self, id: u64) -> EmiCoreResult<bool>;

    fn clear(&mut self) -> EmiCoreResult<()>;

    fn count(&self) -> EmiCoreResult<usize>;
}

/// In-process history, serialisable as a whole.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryHistoryStore {
    #[serde(default)]
    next_id: u64,
    #[serde(default)]
    records: Vec<CalculationRecord>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> u64 {
        let floor = self.records.iter().map(|r| r.id).max().unwrap_or(0);
        self.next_id = self.next_id.max(floor) + 1;
        self.next_id
    }
}

impl HistoryStore for MemoryHistoryStore {
    fn append(&mut self, mut record: CalculationRecord) -> EmiCoreResult<u64> {
        if record.id == UNASSIGNED_ID {
            record.id = self.allocate_id();
        }
        let id = record.id;
        match self.records.iter_mut().find(|r| r.id == id) {
            Some(existing) => *existing = record,
            None => self.records.push(record),
        }
        self.next_id = self.next_id.max(id);
        debug!(id, "history record stored");
        Ok(id)
    }

    fn list(&self) -> EmiCoreResult<Vec<CalculationRecord>> {
        let mut records = self.records.clone();
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        Ok(records)
    }

    fn get(&self, id: u64) -> EmiCoreResult<Option<CalculationRecord>> {
        Ok(self.records.iter().find(|r| r.id == id).cloned())
    }

    fn delete(&mut self, id: u64) -> EmiCoreResult<bool> {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        let removed = self.records.len() != before;
        debug!(id, removed, "history record delete");
        Ok(removed)
    }

    fn clear(&mut self) -> EmiCoreResult<()> {
        self.records.clear();
        debug!("history cleared");
        Ok(())
    }

    fn count(&self) -> EmiCoreResult<usize> {
        Ok(self.records.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amortization::compute;
    use chrono::{Duration, TimeZone};
    use rust_decimal_macros::dec;

    fn record_at(minutes: i64) -> CalculationRecord {
        let input = LoanInput {
            principal: dec!(500_000),
            annual_rate_percent: dec!(9),
            tenure_months: 60,
        };
        let result = compute(input.principal, input.annual_rate_percent, input.tenure_months).unwrap();
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        CalculationRecord::from_result(&input, &result, base + Duration::minutes(minutes))
    }

    #[test]
    fn test_record_copies_summary_fields() {
        let r = record_at(0);
        assert_eq!(r.id, UNASSIGNED_ID);
        assert_eq!(r.loan_amount, dec!(500_000));
        assert_eq!(r.interest_rate, dec!(9));
        assert_eq!(r.tenure_months, 60);
        assert_eq!(r.total_payable, r.emi_amount * dec!(60));
    }

    #[test]
    fn test_append_assigns_increasing_ids() {
        let mut store = MemoryHistoryStore::new();
        let a = store.append(record_at(0)).unwrap();
        let b = store.append(record_at(1)).unwrap();
        assert_eq!(a, 1);
        assert_eq!(b, 2);
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn test_list_is_newest_first() {
        let mut store = MemoryHistoryStore::new();
        store.append(record_at(5)).unwrap();
        store.append(record_at(10)).unwrap();
        store.append(record_at(1)).unwrap();
        let ids: Vec<u64> = store.list().unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
        assert_eq!(store.recent(2).unwrap().len(), 2);
        assert_eq!(store.recent(2).unwrap()[0].id, 2);
    }

    #[test]
    fn test_append_with_existing_id_replaces() {
        let mut store = MemoryHistoryStore::new();
        let id = store.append(record_at(0)).unwrap();
        let mut updated = record_at(3);
        updated.id = id;
        updated.loan_amount = dec!(1);
        assert_eq!(store.append(updated).unwrap(), id);
        assert_eq!(store.count().unwrap(), 1);
        assert_eq!(store.get(id).unwrap().unwrap().loan_amount, dec!(1));
    }

    #[test]
    fn test_delete_and_clear() {
        let mut store = MemoryHistoryStore::new();
        let a = store.append(record_at(0)).unwrap();
        store.append(record_at(1)).unwrap();
        assert!(store.delete(a).unwrap());
        assert!(!store.delete(a).unwrap());
        assert!(store.get(a).unwrap().is_none());
        store.clear().unwrap();
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let mut store = MemoryHistoryStore::new();
        store.append(record_at(0)).unwrap();
        let b = store.append(record_at(1)).unwrap();
        store.delete(b).unwrap();
        assert_eq!(store.append(record_at(2)).unwrap(), 3);
    }

    #[test]
    fn test_snapshot_round_trips_through_json() {
        let mut store = MemoryHistoryStore::new();
        store.append(record_at(0)).unwrap();
        let json = serde_json::to_string(&store).unwrap();
        let mut restored: MemoryHistoryStore = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.list().unwrap(), store.list().unwrap());
        assert_eq!(restored.append(record_at(1)).unwrap(), 2);
    }
}
