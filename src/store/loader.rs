//! Load a whole mailbox into decoded [`MessageRecord`]s.

use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::{PulseError, Result};
use crate::model::message::MessageRecord;
use crate::parser::decoder;
use crate::parser::mbox::MboxParser;

/// A message that could not be decoded and was left out of the run.
#[derive(Debug)]
pub struct DecodeFailure {
    /// Position within the mailbox.
    pub sequence: u64,
    /// Byte offset of the message's separator line.
    pub offset: u64,
    /// Why decoding failed.
    pub error: PulseError,
}

/// Every message of a mailbox, decoded or rejected.
#[derive(Debug, Default)]
pub struct LoadedMailbox {
    /// Successfully decoded records, in mailbox order.
    pub messages: Vec<MessageRecord>,
    /// Messages the decoder rejected.
    pub failures: Vec<DecodeFailure>,
    /// Size of the MBOX file in bytes.
    pub file_size: u64,
}

impl LoadedMailbox {
    /// Number of raw messages seen (decoded plus failed).
    pub fn total(&self) -> usize {
        self.messages.len() + self.failures.len()
    }
}

/// Split and decode an MBOX file.
///
/// Per-message decode failures are logged and collected; only I/O errors on
/// the mailbox itself abort the load. `progress` receives
/// `(bytes_read, file_size)`.
pub fn load_mailbox(
    path: impl AsRef<Path>,
    progress: Option<&dyn Fn(u64, u64)>,
) -> Result<LoadedMailbox> {
    let parser = MboxParser::new(path.as_ref())?;
    let mut mailbox = LoadedMailbox {
        file_size: parser.file_size(),
        ..LoadedMailbox::default()
    };

    parser.parse(
        &mut |raw| {
            match decoder::decode_message(raw.bytes, raw.sequence) {
                Ok(record) => {
                    debug!(sequence = raw.sequence, subject = %record.subject, "Decoded message");
                    mailbox.messages.push(record);
                }
                Err(error) => {
                    warn!(
                        sequence = raw.sequence,
                        offset = raw.offset,
                        error = %error,
                        "Skipping undecodable message"
                    );
                    mailbox.failures.push(DecodeFailure {
                        sequence: raw.sequence,
                        offset: raw.offset,
                        error,
                    });
                }
            }
            true
        },
        progress,
    )?;

    info!(
        path = %parser.path().display(),
        decoded = mailbox.messages.len(),
        failed = mailbox.failures.len(),
        "Loaded mailbox"
    );

    Ok(mailbox)
}
