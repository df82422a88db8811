//! Windows installer creation.
//!
//! - `msi` - WiX MSI authoring, compilation and linking
//! - `sign` - Authenticode signing of the built installer

pub mod msi;
pub mod sign;
