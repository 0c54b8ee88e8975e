//! Action decision control: a fixed, ordered rule list that decides
//! whether an action may proceed automatically.

pub mod rules;
pub mod types;

pub use rules::*;
pub use types::*;
