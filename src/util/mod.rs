//! Utility modules for Lexmatch.

pub mod varint;
