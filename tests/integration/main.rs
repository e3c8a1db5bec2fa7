//! PPSPP integration test harness.
//!
//! These tests exercise the codec and connector crates together from the
//! outside, the way an application would, rather than unit-by-unit.

mod connector;
mod keepalive;
mod wire;
