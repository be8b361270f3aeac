use crate::domain::DeliveryRecord;
use crate::errors::RelayResult;

/// Result of recording a delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// Another cycle already recorded this guid
    Duplicate,
}

#[cfg_attr(test, mockall::automock)]
pub trait DeliveryStore: Send + Sync {
    fn exists(&self, guid: &str) -> RelayResult<bool>;
    fn insert(&self, record: &DeliveryRecord) -> RelayResult<InsertOutcome>;
    fn get(&self, guid: &str) -> RelayResult<Option<DeliveryRecord>>;
    fn count(&self) -> RelayResult<u64>;
}
