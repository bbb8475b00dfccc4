//! Shared infrastructure for the recognition workspace: logging setup,
//! config file formats and bounded parallel helpers.

pub mod file_format;
pub mod log_setup;
pub mod parallel;
pub mod serde;

pub use file_format::{FileFormat, FileFormatError};
pub use self::serde::{deserialize, load_from_file, serialize, SerdeError};
