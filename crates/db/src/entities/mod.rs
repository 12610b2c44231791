//! Database entities.

pub mod category;
pub mod entry;
pub mod entry_category;
pub mod round;
pub mod vote;

pub use category::Entity as Category;
pub use entry::Entity as Entry;
pub use entry_category::Entity as EntryCategory;
pub use round::Entity as Round;
pub use vote::Entity as Vote;
