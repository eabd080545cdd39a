mod cache;
mod notifier;
mod service;
mod sweeper;

pub use cache::IdentityCache;
pub use notifier::{LogNotifier, Notifier};
pub use service::BookingService;
pub use sweeper::start_sweeper;
