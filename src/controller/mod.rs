//! API controller modules, one per route.

pub mod assets;
pub mod comparison;
pub mod correlation;
pub mod history;
pub mod market_dominance;
pub mod misc;
pub mod roi;
pub mod symbol;
pub mod trend;
pub mod version;
pub mod volatility;
pub mod volume;
