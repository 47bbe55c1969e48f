//! I/O utilities for archive operations.
//!
//! This module provides the reader shared between concurrent entry tasks and
//! the buffered copy loop that separates read failures from write failures.

pub mod copy;
pub mod shared;

// Re-export main types for convenience
pub use copy::CopyBuffer;
pub use copy::CopyError;
pub use copy::copy_with_buffer;
pub use shared::SharedFile;
