pub mod chart;
pub mod config;
pub mod fetch;
pub mod locate;
pub mod logging;
pub mod series;
