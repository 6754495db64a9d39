mod search_controller;
mod search_error;
mod search_outcome;

pub use search_controller::*;
pub use search_error::*;
pub use search_outcome::*;

#[cfg(test)]
#[path = "./search_test.rs"]
mod search_test;
