//! Document module: the values handed to the index build path and read back
//! by field comparers.

#[allow(clippy::module_inception)]
pub mod document;
pub mod field_value;

// Re-export commonly used types
pub use document::{Document, DocumentBuilder};
pub use field_value::FieldValue;
