//! ARMv7-M instruction catalog.
//!
//! Cortex-M parts execute Thumb only, so the catalog lives in [`thumb`]:
//! 16-bit encodings plus the 32-bit `bl`.

pub mod thumb;
