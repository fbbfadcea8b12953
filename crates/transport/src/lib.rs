//! # Transport
//!
//! Send transports invoked by the dispatch controller, one request at a time.
//!
//! Every transport:
//! - validates required fields and address syntax before delivering
//! - answers invalid input with a `success = false` reply, not an error
//! - raises `ContractError::Transport` only when delivery could not be attempted

mod compose;
mod dry_run;
mod factory;
mod http;
mod mock;
mod sendmail;
mod validate;

pub use compose::{compose_message, encode_header_value, X_MAILER};
pub use contracts::{SendRequest, SendTransport, TransportReply};
pub use dry_run::DryRunTransport;
pub use factory::AnyTransport;
pub use http::{form_fields, HttpTransport};
pub use mock::MockTransport;
pub use sendmail::SendmailTransport;
pub use validate::validate_request;
