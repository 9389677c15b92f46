pub mod builder;
pub mod value;

// Re-export key types for easier usage
pub use builder::{BuildError, Builder, Hint};
pub use value::{Mapping, Scalar, Value};
