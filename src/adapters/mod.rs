pub mod fs;
pub mod universe;
