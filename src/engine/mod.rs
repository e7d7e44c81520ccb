pub mod value;
pub use value::*;

pub mod error;
pub use error::*;

pub mod dates;
pub use dates::*;

pub mod row;
pub use row::*;

pub mod predicate;
pub use predicate::*;

pub mod frame;
pub use frame::*;

pub mod join;

pub mod aggregates;

pub mod group;
pub use group::*;

pub mod window;
pub use window::*;
