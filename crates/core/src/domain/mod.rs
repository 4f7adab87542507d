pub mod driver;
pub mod sheets;

// Re-export commonly used types
pub use driver::*;
