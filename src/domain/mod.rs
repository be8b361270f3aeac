pub mod article;
pub mod delivery_record;
pub mod notification;

pub use article::{Article, Category};
pub use delivery_record::{to_iso_timestamp, DeliveryRecord};
pub use notification::Notification;
