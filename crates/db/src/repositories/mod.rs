//! Database repositories.

pub mod category;
pub mod entry;
pub mod round;
pub mod vote;

pub use category::CategoryRepository;
pub use entry::EntryRepository;
pub use round::RoundRepository;
pub use vote::VoteRepository;
