// Data types shared by the installer stages.

pub mod config;
pub mod errors;
pub mod install;
pub mod platform;
pub mod release;
