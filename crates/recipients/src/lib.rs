//! # Recipients
//!
//! Queue builder: turns raw multi-line recipient input into an ordered
//! `RecipientQueue` and checks entries against the simple address pattern.
//!
//! Parsing never filters by validity; callers reject the whole batch when
//! [`invalid_recipients`] is non-empty.

mod address;
mod error;
mod parser;

pub use address::{invalid_recipients, is_plausible_address};
pub use error::RecipientsError;
pub use parser::{load_recipients, parse_recipients, parse_sources};

pub use contracts::{Recipient, RecipientQueue};
