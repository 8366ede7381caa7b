//! Database model modules - extends Database with domain-specific methods
//!
//! Each module adds `impl Database` blocks with methods for one table.

mod interactions; // interactions (append-only conversational log)
mod subscribers; // subscribers (one current row per recipient)
