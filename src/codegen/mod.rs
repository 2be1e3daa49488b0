//! Go source emission: a small declaration tree and its printer.

pub mod ast;
pub mod printer;

/// First line of every generated unit. Files starting with it may be deleted on regeneration.
pub const GENERATED_HEADER: &str = "// ErrProxy Generated File, DO NOT EDIT";

/// Package comment carried by every generated unit (without the comment marker).
pub const GENERATED_COMMENT: &str = "ErrProxy Generated File, DO NOT EDIT";
