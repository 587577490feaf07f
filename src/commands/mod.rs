// Orchestrates one installer run from parsed flags to the final summary.
pub mod install;
