pub mod download;
pub mod package;
pub mod probe;
