//! Test harness for end-to-end tests of the bclog pipeline.

pub mod harness;
