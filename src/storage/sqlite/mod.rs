mod connection;
mod delivery_repository;

pub use connection::SqliteStorage;
pub use delivery_repository::SqliteDeliveryRepository;
