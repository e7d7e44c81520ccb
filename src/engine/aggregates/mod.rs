pub mod accumulator;
pub use accumulator::*;

pub mod aggregate_impl;
pub use aggregate_impl::*;

pub mod registry;
pub use registry::*;

pub mod functions;
pub use functions::*;
