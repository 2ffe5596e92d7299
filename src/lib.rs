//! Fluent builder for constructing and dispatching SMS notifications.
//!
//! The crate is organized as a domain layer of strong types, a notification
//! core ([`MessageBuilder`]) generic over a template model, and a client
//! layer with the default HTTP notifier. Delivery and template rendering are
//! trait seams ([`Notifier`], [`TemplateRenderer`]), so any gateway or
//! rendering engine can be plugged in.
//!
//! ```rust,no_run
//! use eazysms::{ApiKey, HttpNotifier, MessageBuilder, NoTemplates, Recipient, SenderId};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let notifier = HttpNotifier::new(ApiKey::new("...")?);
//!     MessageBuilder::<()>::new()
//!         .from(SenderId::new("ACME")?)
//!         .recipients(vec![Recipient::new("+15551234567")?])
//!         .text("Hello")
//!         .send(&NoTemplates, &notifier)
//!         .await?;
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
pub mod notify;
mod transport;

pub use client::{DeliveryError, DispatchAck, HttpNotifier, HttpNotifierBuilder};
pub use domain::{
    ApiKey, Attachment, Channel, Message, PhoneNumber, Recipient, SenderId, ValidationError,
};
pub use notify::{
    BoxError, BoxFuture, MessageBuilder, NoTemplates, Notifier, SendError, TemplateRenderer,
};
