//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod graph;
pub mod prompt;
pub mod utils;

// Re-export main command functions
pub use graph::{execute_graph, validate_args, GraphArgs, GraphOutcome};
pub use prompt::{prompt_selection, resolve_selection, Selection};
pub use utils::{display_schema, display_version, validate_report_file};
