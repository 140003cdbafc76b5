//! Command implementations for the pchtxt-rs CLI

pub mod info;
pub mod validate;
