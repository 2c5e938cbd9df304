//! the test_utils folder here shares fixtures and test doubles between the
//! unit tests of every module
mod common;
mod mock;
mod test_record;

pub use common::*;
pub use mock::*;
pub use test_record::*;
