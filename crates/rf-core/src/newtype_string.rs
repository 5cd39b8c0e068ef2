//! Macro for defining strongly-typed identifier newtypes.
//!
//! All identifier newtypes share the same invariants (non-empty,
//! case-normalized to ASCII lowercase) and the same set of trait impls
//! (Display, Deref, AsRef, Borrow, TryFrom, PartialEq, Serialize,
//! Deserialize). This macro generates all of that from a single invocation.
//!
//! Case normalization happens at construction, so two names that differ only
//! in case are the same key in maps and sets. Database catalogs disagree on
//! identifier casing (H2 uppercases, Postgres lowercases), so the wrapper is
//! the single place where that is smoothed over.

/// Define a strongly-typed, non-empty, lowercase-normalized identifier newtype.
///
/// Generates:
/// - The struct with `Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize`
/// - Custom `Deserialize` (rejects empty strings, normalizes case)
/// - `new()` (panics on empty), `try_new()` (returns Option), `as_str()`, `into_inner()`
/// - `Display`, `AsRef<str>`, `Deref<Target=str>`, `Borrow<str>`
/// - `TryFrom<String>`, `TryFrom<&str>`
/// - `PartialEq<str>`, `PartialEq<&str>`, `PartialEq<String>`
macro_rules! define_identifier {
    (
        $(#[$meta:meta])*
        $vis:vis struct $Name:ident;
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
        $vis struct $Name(String);

        impl<'de> serde::Deserialize<'de> for $Name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                $Name::try_new(s)
                    .ok_or_else(|| serde::de::Error::custom(concat!(stringify!($Name), " must not be empty")))
            }
        }

        impl $Name {
            /// Create a new instance, panicking if the name is empty.
            ///
            /// Prefer [`try_new`](Self::try_new) when handling untrusted input.
            pub fn new(name: impl AsRef<str>) -> Self {
                Self::try_new(name)
                    .unwrap_or_else(|| panic!(concat!(stringify!($Name), " must not be empty")))
            }

            /// Try to create a new instance, returning `None` if the name is empty.
            ///
            /// The name is normalized to ASCII lowercase.
            pub fn try_new(name: impl AsRef<str>) -> Option<Self> {
                let s = name.as_ref();
                if s.is_empty() {
                    None
                } else {
                    Some(Self(s.to_ascii_lowercase()))
                }
            }

            /// Return the normalized name as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the inner `String`.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl std::fmt::Display for $Name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $Name {
            fn as_ref(&self) -> &str { &self.0 }
        }

        impl std::ops::Deref for $Name {
            type Target = str;
            fn deref(&self) -> &str { &self.0 }
        }

        impl std::borrow::Borrow<str> for $Name {
            fn borrow(&self) -> &str { &self.0 }
        }

        impl TryFrom<String> for $Name {
            type Error = &'static str;
            fn try_from(s: String) -> Result<Self, Self::Error> {
                $Name::try_new(s).ok_or(concat!(stringify!($Name), " must not be empty"))
            }
        }

        impl TryFrom<&str> for $Name {
            type Error = &'static str;
            fn try_from(s: &str) -> Result<Self, Self::Error> {
                $Name::try_new(s).ok_or(concat!(stringify!($Name), " must not be empty"))
            }
        }

        impl PartialEq<str> for $Name {
            fn eq(&self, other: &str) -> bool { self.0 == other }
        }

        impl PartialEq<&str> for $Name {
            fn eq(&self, other: &&str) -> bool { self.0 == *other }
        }

        impl PartialEq<String> for $Name {
            fn eq(&self, other: &String) -> bool { self.0 == *other }
        }
    };
}

pub(crate) use define_identifier;
