pub mod args;
pub mod compute;
pub mod run;
pub mod verify;
