pub mod config;
pub mod logging;

pub mod dupkeys;
pub mod playlist;
pub mod wrap;
