//! Data models
//!
//! 预订、候位与餐厅配置。日期/时间一律为餐厅本地民用时间，不带时区。

pub mod reservation;
pub mod serde_helpers;
pub mod settings;
pub mod slot;
pub mod waitlist;

// Re-exports
pub use reservation::*;
pub use settings::*;
pub use slot::*;
pub use waitlist::*;
