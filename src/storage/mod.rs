//! Local key-value storage: adapters, namespaced keys and typed accessors.

mod adapter;
mod helper;
pub mod keys;
mod sqlite;
mod user;

pub use adapter::*;
pub use helper::*;
pub use keys::StorageKeys;
pub use sqlite::*;
pub use user::*;
