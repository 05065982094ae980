pub mod sqlite;

pub use sqlite::{Storage, StoredEvaluation};
