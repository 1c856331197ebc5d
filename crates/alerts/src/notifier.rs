//! Alert delivery.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use farewatch_core::Money;
use thiserror::Error;
use tracing::info;

/// Failure to hand an alert to the transport.
///
/// Alert-local: the caller logs it and leaves the notification ledger
/// untouched, so a later cycle can retry.
#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("rejected by provider: status {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Delivers a formatted alert message.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: &str) -> Result<(), DeliveryError>;
}

#[async_trait]
impl Notifier for Box<dyn Notifier> {
    async fn send(&self, message: &str) -> Result<(), DeliveryError> {
        (**self).send(message).await
    }
}

/// Notifier of last resort: logs the alert body instead of sending it.
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, message: &str) -> Result<(), DeliveryError> {
        info!(body = message, "alert (SMS not configured)");
        Ok(())
    }
}

/// Format the text-message body for a qualifying fare.
pub fn format_alert_message(
    route_label: &str,
    origin_name: &str,
    destination_name: &str,
    travel_date: NaiveDate,
    train_number: &str,
    departure: NaiveTime,
    price: Money,
) -> String {
    format!(
        "🚂 Fare alert!\n\n\
         {route_label}\n\
         {origin_name} → {destination_name}\n\
         Date: {travel_date}\n\
         Train {train_number}\n\
         Depart: {}\n\
         💰 {price}",
        departure.format("%H:%M")
    )
}
