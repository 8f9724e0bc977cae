pub mod file_io;
pub mod precision;
pub mod stopwatch;
