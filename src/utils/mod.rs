//! Shared helpers used across the archive codec and transcoder.
pub mod counter;
pub mod files;
pub mod num_range;
