pub mod entry;
pub mod layout;
pub mod session;

pub use entry::{EntryRecord, EntryType, EveningEntry, MorningEntry, RefuelingEntry};
pub use session::{DriverSession, SessionError};
