//! Output value encodings.

pub mod json;
