//! Passphrase holder that wipes itself on drop

use std::fmt;
use std::ops::Deref;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{PortalError, PortalResult};

/// The document vault passphrase
///
/// Never printed: `Debug` and `Display` show only the length.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Passphrase {
    inner: String,
}

impl Passphrase {
    /// Wrap a passphrase, rejecting empty input
    pub fn new(s: impl Into<String>) -> PortalResult<Self> {
        let inner = s.into();
        if inner.is_empty() {
            return Err(PortalError::InvalidConfiguration(
                "Document passphrase must not be empty".into(),
            ));
        }
        Ok(Self { inner })
    }

    pub fn as_str(&self) -> &str {
        &self.inner
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl Deref for Passphrase {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl AsRef<str> for Passphrase {
    fn as_ref(&self) -> &str {
        &self.inner
    }
}

impl fmt::Debug for Passphrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Passphrase")
            .field("len", &self.inner.len())
            .finish()
    }
}

impl fmt::Display for Passphrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED {} bytes]", self.inner.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passphrase_creation() {
        let p = Passphrase::new("vault").unwrap();
        assert_eq!(p.as_str(), "vault");
        assert_eq!(p.len(), 5);
    }

    #[test]
    fn test_empty_rejected() {
        assert!(Passphrase::new("").is_err());
    }

    #[test]
    fn test_debug_and_display_redact() {
        let p = Passphrase::new("secret").unwrap();
        let debug = format!("{:?}", p);
        let display = format!("{}", p);
        assert!(!debug.contains("secret"));
        assert!(!display.contains("secret"));
        assert!(display.contains("REDACTED"));
    }
}
