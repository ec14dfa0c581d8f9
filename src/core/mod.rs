//! # Core Module
//!
//! 애플리케이션 전역에서 사용하는 기반 기능을 제공합니다.
//!
//! - [`errors`] - `AppError`, `AppResult`, `ErrorContext`
//! - [`registry`] - 프로세스 전역 컴포넌트를 보관하는 `ServiceLocator`

pub mod errors;
pub mod registry;

pub use errors::*;
pub use registry::*;
