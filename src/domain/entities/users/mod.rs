//! 사용자 엔티티

pub mod user_info;

pub use user_info::UserInfo;
