mod goal;
mod priority;
mod routine;
mod task;
mod user;

pub mod hhmm;

pub use goal::*;
pub use priority::*;
pub use routine::*;
pub use task::*;
pub use user::*;
