pub mod error;
pub mod layout;
pub mod size;

pub use layout::*;
pub use size::*;
