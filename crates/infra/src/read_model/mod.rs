//! Read-mostly storage for master data and session records.

pub mod menu_store;
pub mod role_store;
pub mod session_store;
pub mod user_directory;

pub use menu_store::{InMemoryMenuStore, MenuStore};
pub use role_store::InMemoryRoleStore;
pub use session_store::{InMemorySessionStore, SessionStore};
pub use user_directory::{InMemoryUserDirectory, UserDirectory};
