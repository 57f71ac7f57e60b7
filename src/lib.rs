pub mod config;
pub mod dashboard;
pub mod format;
pub mod gauge;
pub mod logging;
pub mod macro_impact;
pub mod metric_cards;
pub mod news;
pub mod scheduler;
pub mod series;
pub mod summary;
