//! Fare alert decision and delivery.
//!
//! This crate provides:
//! - the threshold + dedup alert policy backed by the notification ledger
//! - the `Notifier` delivery trait, with a Twilio SMS transport and a
//!   logging fallback
//! - alert message formatting

pub mod notifier;
pub mod policy;
pub mod sms;

pub use notifier::{format_alert_message, DeliveryError, LogNotifier, Notifier};
pub use policy::AlertPolicy;
pub use sms::{SmsConfig, SmsNotifier};
