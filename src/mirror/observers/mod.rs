mod csv_observer;
mod log_observer;

pub use csv_observer::*;
pub use log_observer::*;
