pub mod scheduler;

pub use scheduler::{ScheduledWork, Scheduler, Work};
