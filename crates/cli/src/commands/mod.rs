//! Command implementations.

mod info;
mod init;
mod send;
mod validate;

pub use info::run_info;
pub use init::run_init;
pub use send::run_send;
pub use validate::run_validate;
