//! Contact directory: sender address → canonical display name.

use std::borrow::Cow;
use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use encoding_rs::Encoding;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::error::{PulseError, Result};

/// Loose address shape: `non-space @ non-space . non-space`. No RFC validation.
static ADDRESS_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("valid address pattern"));

/// Mapping from email address (case-sensitive, as written) to a person's name.
///
/// Several addresses may map to the same name. An empty directory is valid:
/// resolution then falls back to the raw address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directory {
    names: HashMap<String, String>,
}

impl Directory {
    /// An empty directory.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a directory from tabular rows.
    ///
    /// The first field of each row is the person's name; every field shaped
    /// like an address maps to it. When an address appears in several rows,
    /// the last row wins. Rows with a blank name are ignored.
    pub fn from_rows<R, F>(rows: R) -> Self
    where
        R: IntoIterator<Item = Vec<F>>,
        F: AsRef<str>,
    {
        let mut names = HashMap::new();
        for row in rows {
            let Some(name) = row.first().map(|f| f.as_ref().trim().to_string()) else {
                continue;
            };
            // A blank name never becomes an author key
            if name.is_empty() {
                debug!(fields = row.len(), "Skipping contact row without a name");
                continue;
            }
            for field in &row {
                let field = field.as_ref().trim();
                if is_address_shaped(field) {
                    if let Some(previous) = names.insert(field.to_string(), name.clone()) {
                        if previous != name {
                            debug!(address = field, previous = %previous, name = %name, "Contact address reassigned");
                        }
                    }
                }
            }
        }
        Self { names }
    }

    /// Parse CSV text (no header row, rows of any width).
    pub fn from_csv_str(text: &str) -> std::result::Result<Self, csv::Error> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(String::from).collect::<Vec<_>>());
        }
        Ok(Self::from_rows(rows))
    }

    /// Load a contacts file.
    ///
    /// `encoding` is `"auto"` (BOM sniffing, UTF-8 otherwise) or a WHATWG
    /// label. A missing file is not an error: it yields an empty directory.
    pub fn load(path: impl AsRef<Path>, encoding: &str) -> Result<Self> {
        let path = path.as_ref();
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "Contacts file not found, continuing without it");
                return Ok(Self::empty());
            }
            Err(e) => return Err(PulseError::io(path, e)),
        };

        let text = decode_text(&bytes, encoding)?;
        let directory = Self::from_csv_str(&text).map_err(|source| PulseError::Contacts {
            path: path.to_path_buf(),
            source,
        })?;

        info!(path = %path.display(), addresses = directory.len(), "Loaded contacts");
        Ok(directory)
    }

    /// The author key for a sender: the contact name when known, else the
    /// address itself.
    pub fn resolve<'a>(&'a self, address: &'a str) -> &'a str {
        self.names.get(address).map(String::as_str).unwrap_or(address)
    }

    /// Name registered for an address, if any.
    pub fn get(&self, address: &str) -> Option<&str> {
        self.names.get(address).map(String::as_str)
    }

    /// Number of registered addresses.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// `true` when no address is registered.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

fn is_address_shaped(field: &str) -> bool {
    ADDRESS_SHAPE.is_match(field)
}

/// Decode file bytes per the configured encoding.
fn decode_text<'a>(bytes: &'a [u8], encoding: &str) -> Result<Cow<'a, str>> {
    let encoding = if encoding.eq_ignore_ascii_case("auto") {
        match Encoding::for_bom(bytes) {
            Some((enc, _)) => enc,
            None => encoding_rs::UTF_8,
        }
    } else {
        Encoding::for_label(encoding.as_bytes())
            .ok_or_else(|| PulseError::UnsupportedEncoding(encoding.to_string()))?
    };

    // `decode` sniffs and strips a BOM itself
    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        warn!(encoding = used.name(), "Contacts file has invalid sequences, replaced");
    }
    Ok(text)
}
