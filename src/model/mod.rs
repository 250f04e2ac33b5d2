//! Core data model types: addresses and decoded message records.

pub mod address;
pub mod message;
