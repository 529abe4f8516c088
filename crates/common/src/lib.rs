//! Common utilities and constants used across the jobscope codebase.
//!
//! This crate provides shared functionality for the jobscope toolkit, such as
//! input detection patterns, hex helpers and file IO.

/// Constants used throughout the jobscope codebase.
pub mod constants;

/// General utility functions and types for common tasks.
pub mod utils;
