//! CLI command handlers. Each command is in its own file.

mod ext;
mod formats;
mod save;

pub use ext::run_ext;
pub use formats::run_formats;
pub use save::{read_value, run_save, SaveArgs};
