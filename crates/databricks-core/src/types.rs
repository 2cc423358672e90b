//! Shared value types and encoding helpers.
//!
//! The Databricks API models most enumerations as strings that grow new
//! members over time. [`open_string!`](crate::open_string) generates a
//! transparent string newtype with associated constants for the known
//! members, so an unknown server value decodes and re-encodes unchanged.

/// Generates an open string type with associated constants.
///
/// ```
/// databricks_core::open_string! {
///     /// State of a widget
///     WidgetState {
///         ACTIVE = "ACTIVE",
///         RETIRED = "RETIRED",
///     }
/// }
///
/// let state: WidgetState = serde_json::from_str(r#""BRAND_NEW""#).unwrap();
/// assert_eq!(state.as_str(), "BRAND_NEW");
/// assert_ne!(state, WidgetState::ACTIVE);
/// ```
#[macro_export]
macro_rules! open_string {
    ($(#[$meta:meta])* $name:ident { $($variant:ident = $value:literal),* $(,)? }) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord,
            ::serde::Serialize, ::serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(::std::borrow::Cow<'static, str>);

        impl $name {
            $(
                #[doc = concat!("`", $value, "`")]
                pub const $variant: Self = Self(::std::borrow::Cow::Borrowed($value));
            )*

            /// Creates a value from an arbitrary string.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(::std::borrow::Cow::Owned(value.into()))
            }

            /// Returns the wire representation.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns true if the value is one of the associated constants.
            #[must_use]
            pub fn is_known(&self) -> bool {
                matches!(self.as_str(), $($value)|*)
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl ::std::convert::From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl ::std::convert::From<String> for $name {
            fn from(value: String) -> Self {
                Self::new(value)
            }
        }

        impl ::std::convert::AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

/// Serde adapter for binary fields carried as base64 strings.
///
/// A missing or `null` field decodes to an empty buffer.
pub mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize bytes as a base64 string.
    ///
    /// # Errors
    ///
    /// Propagates serializer failures.
    pub fn serialize<T, S>(bytes: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: AsRef<[u8]>,
        S: Serializer,
    {
        serializer.serialize_str(&STANDARD.encode(bytes.as_ref()))
    }

    /// Deserialize a base64 string into bytes.
    ///
    /// # Errors
    ///
    /// Fails if the value is not a string of valid base64.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(text) => STANDARD.decode(text.trim()).map_err(D::Error::custom),
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    crate::open_string! {
        /// Test enumeration
        Color {
            RED = "RED",
            GREEN = "GREEN",
        }
    }

    #[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
    struct Payload {
        #[serde(default, with = "base64_bytes")]
        data: Vec<u8>,
    }

    #[test]
    fn test_open_string_known_values() {
        let color: Color = serde_json::from_str(r#""RED""#).unwrap();
        assert_eq!(color, Color::RED);
        assert!(color.is_known());
        assert_eq!(serde_json::to_string(&Color::GREEN).unwrap(), r#""GREEN""#);
    }

    #[test]
    fn test_open_string_preserves_unknown_values() {
        let color: Color = serde_json::from_str(r#""ULTRAVIOLET""#).unwrap();
        assert!(!color.is_known());
        assert_eq!(color.to_string(), "ULTRAVIOLET");
        assert_eq!(serde_json::to_string(&color).unwrap(), r#""ULTRAVIOLET""#);
        assert_eq!(Color::from("RED"), Color::RED);
    }

    #[test]
    fn test_base64_bytes_adapter() {
        let payload = Payload {
            data: b"print(1)".to_vec(),
        };
        let json = serde_json::to_string(&payload).unwrap();
        assert_eq!(json, r#"{"data":"cHJpbnQoMSk="}"#);
        assert_eq!(serde_json::from_str::<Payload>(&json).unwrap(), payload);

        assert_eq!(serde_json::from_str::<Payload>("{}").unwrap(), Payload::default());
        assert_eq!(
            serde_json::from_str::<Payload>(r#"{"data":null}"#).unwrap(),
            Payload::default()
        );
        assert!(serde_json::from_str::<Payload>(r#"{"data":"@@"}"#).is_err());
    }
}
