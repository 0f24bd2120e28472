//! Stream combinators for published state

mod sample;

pub use sample::{Sample, SampleExt};
