pub mod cardroom;
pub mod journal;

pub use cardroom::{CardroomService, SeatOutcome};
pub use journal::{ChannelJournal, Journal, MemoryJournal};
