//! Mailbox input: the streaming MBOX splitter, the per-message decoder,
//! and lenient header/date helpers.

pub mod decoder;
pub mod header;
pub mod mbox;
