pub mod traits;
pub mod sqlite;

pub use traits::{DeliveryStore, InsertOutcome};
pub use sqlite::{SqliteStorage, SqliteDeliveryRepository};
