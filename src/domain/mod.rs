//! Domain layer: strong types with validation and invariants (no I/O).

mod message;
mod validation;
mod value;

pub use message::{Attachment, Channel, Message};
pub use validation::ValidationError;
pub use value::{ApiKey, PhoneNumber, Recipient, SenderId};
