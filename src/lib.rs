//! Momentum client: the HTTP service layer over the goals/routines backend,
//! progress write-back, and background polling. Domain types and pure logic
//! live in [`momentum_core`].

pub mod api;
pub mod config;
pub mod poll;
pub mod sync;
