pub mod console;
pub mod sink;
pub mod summary;
