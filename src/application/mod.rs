//! Application layer: outline loading and use cases over the domain
//!
//! This layer orchestrates domain logic and owns file I/O.

pub mod error;
pub mod error_ext;
pub mod outline;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use outline::{load_outline, parse_outline, LoadedTree, OutlineFile};
