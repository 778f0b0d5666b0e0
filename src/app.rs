#[allow(clippy::module_inception)]
mod app;
pub mod detail;
pub mod omd;
pub mod rating;
pub mod search;
pub mod utils;
pub mod watchlist;

pub use app::{App, CurrentScreen};
