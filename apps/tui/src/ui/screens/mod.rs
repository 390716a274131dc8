pub mod dashboard;
pub mod edit_entry;
pub mod journal;
