use abi::FarmerId;
use async_trait::async_trait;
use tracing::info;

/// delivery seam for booking events; the actual transport (email, push,
/// in-app feed) lives outside this core
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, farmer_id: FarmerId, title: &str, message: &str);
}

/// records the notification in the log and nothing else
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, farmer_id: FarmerId, title: &str, message: &str) {
        info!(farmer_id, title, message, "booking notification");
    }
}
