// Armory demo: an author that cycles armor options and the subscribers
// reacting to it, wired together only through the event hub.

pub use journal::{ArmoryJournal, JournalEntry};
pub use parts::PartType;
pub use prince_stats::PrinceStats;
pub use selector::ArmorSelector;

mod journal;
mod parts;
mod prince_stats;
mod selector;
