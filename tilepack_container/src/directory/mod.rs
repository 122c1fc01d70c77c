mod scanner;
pub use scanner::*;
