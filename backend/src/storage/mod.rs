pub mod csv;
pub mod traits;

pub use csv::CsvConnection;
pub use traits::{BreedingStorage, Connection, CredentialStorage, ReminderStorage};
