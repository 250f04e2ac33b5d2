//! Email address representation (RFC 5322 §3.4, loosely).

/// A sender or recipient address.
///
/// # Examples
/// - `"Ana Pérez <ana@example.com>"` → `display_name = Some("Ana Pérez")`, `address = "ana@example.com"`
/// - `"ana@example.com"` → `display_name = None`, `address = "ana@example.com"`
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct EmailAddress {
    /// Human-readable display name, when the header carried one.
    pub display_name: Option<String>,
    /// The bare address (`user@domain`), exactly as written.
    pub address: String,
}

impl EmailAddress {
    /// Build an address from already-separated parts.
    ///
    /// Empty display names are normalized to `None`.
    pub fn new(display_name: Option<&str>, address: &str) -> Self {
        let display_name = display_name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(String::from);
        Self {
            display_name,
            address: address.trim().to_string(),
        }
    }

    /// Parse a single address from a raw header value.
    ///
    /// Supported formats:
    /// - `"user@domain.com"`
    /// - `"<user@domain.com>"`
    /// - `"Display Name <user@domain.com>"`
    /// - `"\"Display, Name\" <user@domain.com>"`
    ///
    /// Returns `None` when the value is blank or holds no `@` address, as
    /// with a bare display name such as `undisclosed-recipients`.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }

        if let (Some(open), Some(close)) = (trimmed.rfind('<'), trimmed.rfind('>')) {
            if close > open {
                let addr = trimmed[open + 1..close].trim();
                if !addr.contains('@') {
                    return None;
                }
                let name = strip_quotes(&trimmed[..open]);
                return Some(Self::new(Some(&name), addr));
            }
        }

        if !trimmed.contains('@') {
            return None;
        }
        Some(Self::new(None, trimmed))
    }
}

/// Strip surrounding double-quotes and trim whitespace.
fn strip_quotes(s: &str) -> String {
    let trimmed = s.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        trimmed[1..trimmed.len() - 1].trim().to_string()
    } else {
        trimmed.to_string()
    }
}

impl std::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.display_name {
            Some(name) => write!(f, "{name} <{}>", self.address),
            None => f.write_str(&self.address),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_address() {
        let addr = EmailAddress::parse("user@example.com").unwrap();
        assert_eq!(addr.address, "user@example.com");
        assert_eq!(addr.display_name, None);
    }

    #[test]
    fn test_parse_angle_address() {
        let addr = EmailAddress::parse("<user@example.com>").unwrap();
        assert_eq!(addr.address, "user@example.com");
        assert_eq!(addr.display_name, None);
    }

    #[test]
    fn test_parse_quoted_name() {
        let addr = EmailAddress::parse("\"Last, First\" <user@example.com>").unwrap();
        assert_eq!(addr.address, "user@example.com");
        assert_eq!(addr.display_name.as_deref(), Some("Last, First"));
    }

    #[test]
    fn test_parse_blank() {
        assert!(EmailAddress::parse("   ").is_none());
        assert!(EmailAddress::parse("Nobody <>").is_none());
    }

    #[test]
    fn test_parse_name_without_address() {
        assert!(EmailAddress::parse("undisclosed-recipients").is_none());
        assert!(EmailAddress::parse("undisclosed-recipients:;").is_none());
        assert!(EmailAddress::parse("Team <team>").is_none());
    }

    #[test]
    fn test_display() {
        let named = EmailAddress::new(Some("Alice"), "alice@example.com");
        assert_eq!(named.to_string(), "Alice <alice@example.com>");
        let bare = EmailAddress::new(Some(""), "alice@example.com");
        assert_eq!(bare.to_string(), "alice@example.com");
    }
}
