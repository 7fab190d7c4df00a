//! Utility functions shared across layers.
//!
//! - [`http`] - Response header helpers
//! - [`intern_id`] - Intern ID generation and shape checks
//! - [`qr`] - QR code rendering to PNG
//! - [`text`] - Name normalization and date display formatting

pub mod http;
pub mod intern_id;
pub mod qr;
pub mod text;
