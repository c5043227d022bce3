//! Record contract implemented by every storable value type.

use serde::{Serialize, de::DeserializeOwned};

/// A value that can live in a [`crate::Store`].
///
/// The store is generic over one record type, so decoding never needs runtime
/// type dispatch. [`Default`] supplies the placeholder kept for entries that
/// fail to decode under the lenient policy.
///
/// ```
/// use kvstore::record::Record;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
/// struct Token {
///     user: String,
///     issued_ms: u64,
/// }
///
/// impl Record for Token {
///     fn initialize(mut self) -> Self {
///         self.issued_ms = 42;
///         self
///     }
/// }
///
/// let t = Token { user: "ann".into(), issued_ms: 0 }.initialize();
/// assert_eq!(t.issued_ms, 42);
/// let back = Token::reconstitute(br#"{"user":"ann","issued_ms":42}"#).unwrap();
/// assert_eq!(back, t);
/// ```
pub trait Record: Serialize + DeserializeOwned + Clone + Default + Send + Sync + 'static {
    /// Returns the canonical stored form of a freshly supplied value.
    ///
    /// Called exactly once per `set`, before insertion.
    fn initialize(self) -> Self {
        self
    }

    /// Rebuilds a record from the raw JSON text of one persisted entry.
    fn reconstitute(raw: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(raw)
    }
}
