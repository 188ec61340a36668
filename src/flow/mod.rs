//! Readiness signalling between the bootstrap worker and consumers.

pub mod readiness;
