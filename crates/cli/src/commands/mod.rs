//! Command implementations.

mod capture;
mod info;
mod validate;

pub use capture::run_capture;
pub use info::run_info;
pub use validate::run_validate;
