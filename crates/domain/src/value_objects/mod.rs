//! Value objects - validated newtypes

mod names;

pub use names::UserName;
