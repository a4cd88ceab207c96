//! Command implementations.

pub mod check;
pub mod run;
pub mod sections;

pub use self::check::execute_check;
pub use self::run::{execute_run, summarize_inputs, RunReport};
pub use self::sections::{execute_sections, load_sections};
