pub mod moon;
pub mod popup;
pub mod tables;
