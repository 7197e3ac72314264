//! 预订准入控制
//!
//! ```text
//! ReservationManager (lifecycle, redb 写事务)
//!   ├─ capacity::calculate_capacity   当日 CONFIRMED 快照 → 容量
//!   ├─ evaluation::evaluate           有序规则链 → Decision
//!   ├─ promotion::select_candidate    FIFO first-fit 候位转正
//!   └─ storage::BookingStorage        reservations / waitlist / settings
//!
//! WaitlistExpiryScheduler           每日把过期候位标记为 EXPIRED
//! ```

pub mod capacity;
pub mod evaluation;
pub mod expiry;
pub mod manager;
pub mod promotion;
pub mod settings;
pub mod storage;

#[cfg(test)]
pub(crate) mod test_support;

pub use capacity::{CapacitySnapshot, calculate_capacity};
pub use evaluation::{Decision, Evaluation, EvaluationMetadata, EvaluationRequest, Rule, evaluate};
pub use expiry::WaitlistExpiryScheduler;
pub use manager::{
    CancelOutcome, CreateOutcome, ManagerError, ManagerResult, ReservationManager, StatusChange,
};
pub use promotion::PromotionOutcome;
pub use settings::SettingsProvider;
pub use storage::{BookingStorage, StorageError, StorageResult, StorageStats};
