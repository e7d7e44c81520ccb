pub mod facts;
pub use facts::*;

pub mod revenue;
pub use revenue::*;

pub mod products;
pub use products::*;

pub mod customers;
pub use customers::*;

pub mod cohorts;
pub use cohorts::*;

pub mod catalog;
pub use catalog::*;

#[cfg(test)]
pub mod fixtures;
