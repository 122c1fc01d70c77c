mod reader;
pub use reader::*;

mod writer;
pub use writer::*;
