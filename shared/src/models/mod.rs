//! Data Models
//!
//! 预约系统的共享数据模型：时间表、预约、时段、客户、服务。

pub mod appointment;
pub mod client;
pub mod provider;
pub mod schedule;
pub mod serde_helpers;
pub mod service;
pub mod slot;

// Re-exports
pub use appointment::*;
pub use client::*;
pub use provider::*;
pub use schedule::*;
pub use service::*;
pub use slot::*;
