//! Durable client-side storage contracts.

pub mod key_value;
