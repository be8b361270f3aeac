pub mod notification_service;
pub mod publish_service;

pub use notification_service::{Notifier, Pacing, TelegramNotifier};
pub use publish_service::{CycleReport, DuplicatePolicy, PublishService};
