pub mod journal_entries;

pub use journal_entries::Entity as JournalEntries;
pub use journal_entries::Model as JournalRow;
