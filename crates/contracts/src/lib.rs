//! # Contracts
//!
//! Frozen interface contracts shared by every crate of the mailer workspace:
//! data model, sink/transport traits and the unified error type.
//! Business crates depend on this crate only, never on each other's internals.
//!
//! ## Batch Model
//! - A batch is one sequential run over an immutable `RecipientQueue`
//! - `BatchState` is the single mutable value the dispatch controller owns
//! - Transports see one `SendRequest` at a time

mod batch;
mod campaign;
mod error;
mod message;
mod outcome;
mod recipient;
mod sink;
mod status;
mod transport;

pub use batch::*;
pub use campaign::*;
pub use error::*;
pub use message::*;
pub use outcome::*;
pub use recipient::{Recipient, RecipientQueue};
pub use sink::*;
pub use status::*;
pub use transport::{LocalSendTransport, SendTransport};
