pub mod client;
pub mod tooltips;

pub use client::{ApiClient, FetchError};
pub use tooltips::TooltipIndex;
