pub mod file_format;
pub mod log_setup;
pub mod test_utils;

pub use file_format::{FileExtensionError, SerdeFormat, SerdeFormatError, load_from_file};
