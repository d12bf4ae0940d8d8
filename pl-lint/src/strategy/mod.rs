//! Document sources.
//!
//! Only the filesystem source exists; in-memory documents go straight to
//! `validate_run`.

pub mod fs;
