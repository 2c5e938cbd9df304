pub mod convert;
pub mod serde_helpers;
pub mod time;

#[cfg(test)]
mod utils_test;
