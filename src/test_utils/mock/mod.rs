mod failing_store;
mod observers;
mod writers;

pub use failing_store::*;
pub use observers::*;
pub use writers::*;
