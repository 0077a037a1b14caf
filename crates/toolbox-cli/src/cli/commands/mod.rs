//! CLI command handlers. Each command is in its own file.

mod completions;
mod dup_keys;
mod man;
mod playlist;
mod wrap;

pub use completions::run_completions;
pub use dup_keys::run_dup_keys;
pub use man::run_man;
pub use playlist::run_playlist;
pub use wrap::run_wrap;
