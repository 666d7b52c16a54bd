//! Core library for Momentum.
//!
//! Domain models for goals, sub-goals, routines and tasks, the conversion
//! from the backend's wire format, progress roll-up, breadcrumb navigation,
//! the work tracker, and the local key-value store. Nothing in here talks
//! to the network.
//!
//! # Usage
//!
//! ```
//! use momentum_core::progress;
//! use momentum_core::transform::{transform_goal, WireGoal};
//!
//! let wire: WireGoal = serde_json::from_str(
//!     r#"{"id": 1, "title": "Ship", "sub_goals": [
//!         {"id": 2, "title": "Write", "completed": true},
//!         {"id": 3, "title": "Test", "completed": false}
//!     ]}"#,
//! )?;
//! let mut goal = transform_goal(&wire);
//! progress::recompute(&mut goal);
//! assert_eq!(goal.progress, 50);
//! # Ok::<(), serde_json::Error>(())
//! ```

pub mod breadcrumb;
pub mod db;
pub mod models;
pub mod progress;
pub mod projection;
pub mod tracker;
pub mod transform;

// Re-export commonly used types at crate root
pub use db::Database;
