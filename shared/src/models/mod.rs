//! Domain models for the advisory dashboard

mod advisory;
mod aggregate;
mod district;
mod ndvi;
mod weather;
mod yields;

pub use advisory::*;
pub use aggregate::*;
pub use district::*;
pub use ndvi::*;
pub use weather::*;
pub use yields::*;
