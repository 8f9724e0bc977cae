pub mod common;
pub mod formatter;
pub mod solver;
pub mod verifier;
