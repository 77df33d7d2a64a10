pub mod connect;
pub mod sqlite;
pub mod tables;

pub use connect::Connector;
pub use sqlite::Database;
