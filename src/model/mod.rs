mod models;
mod table;

pub use models::{Cryptocurrency, HighestVolume, HistoricalPrice};
pub use table::Table;
