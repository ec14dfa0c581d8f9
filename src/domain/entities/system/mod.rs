//! 시스템 엔티티

pub mod update_log;

pub use update_log::UpdateLog;
