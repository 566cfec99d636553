//! Prelude module - common imports for livesheet users
//!
//! ```rust
//! use livesheet::prelude::*;
//! ```

pub use crate::{
    // Cell types
    CellError,
    CellKind,
    CellValue,
    CellView,

    // Error types
    Error,
    Position,
    Result,

    // Main types
    Sheet,
    SheetOptions,
    Size,
};
