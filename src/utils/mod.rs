// utility module public api

pub mod memory;

pub use memory::{ProcessWorkingSet, StaticWorkingSet, WorkingSetProbe};
