// Command-line surface of the installer.
pub mod cmd_enums;
