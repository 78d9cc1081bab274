use async_trait::async_trait;

use crate::errors::AlertError;
use crate::models::AlertItem;

/// Delivery callback of an alert subscriber.
#[async_trait]
pub trait IAlertNotifier: Send + Sync {
    async fn notify(&self, alert: &AlertItem) -> Result<(), AlertError>;
}
