// Shared type definitions
// Each submodule defines types used across the hub: catalog records, filters, comparison rows, settings, errors.

pub mod compare;
pub mod errors;
pub mod filter;
pub mod programme;
pub mod settings;
