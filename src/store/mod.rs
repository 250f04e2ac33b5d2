//! Mailbox loading: splits an MBOX and decodes every message.

pub mod loader;
