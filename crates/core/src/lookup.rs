//! Closed enums backed by SMALLINT lookup tables.
//!
//! Each enum variant's discriminant matches the seed data order (1-based)
//! in the corresponding lookup table, and each variant carries the canonical
//! upper-case label used on the wire.

/// Lookup ID type matching SMALLINT/SMALLSERIAL in the database.
pub type LookupId = i16;

/// A SMALLINT read from the database that matches no variant of the target enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Unknown {kind} id {id}")]
pub struct UnknownLookupId {
    pub kind: &'static str,
    pub id: LookupId,
}

/// Define a lookup-table enum.
///
/// Generates:
/// - `id()` / `from_id()` for the database representation,
/// - `as_str()` / `parse()` for the wire representation. `parse` is total:
///   it accepts any casing of a label and rejects everything else with a
///   field-level [`CoreError::Validation`](crate::error::CoreError) naming
///   the given field, never falling back to a default variant,
/// - `TryFrom<LookupId>` so rows can decode straight into the enum.
macro_rules! define_lookup_enum {
    (
        $(#[$meta:meta])*
        $name:ident (field = $field:literal) {
            $( $(#[$vmeta:meta])* $variant:ident = $val:literal => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $label)] $variant = $val ),+
        }

        impl $name {
            /// Every variant, in seed order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Return the database lookup ID.
            pub fn id(self) -> $crate::lookup::LookupId {
                self as $crate::lookup::LookupId
            }

            /// Resolve a database lookup ID.
            pub fn from_id(id: $crate::lookup::LookupId) -> Option<Self> {
                match id {
                    $( $val => Some(Self::$variant), )+
                    _ => None,
                }
            }

            /// Canonical upper-case label.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $label, )+
                }
            }

            /// Parse a label case-insensitively.
            pub fn parse(input: &str) -> Result<Self, $crate::error::CoreError> {
                let trimmed = input.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(trimmed))
                    .ok_or_else(|| {
                        let allowed: Vec<&str> = Self::ALL.iter().map(|v| v.as_str()).collect();
                        $crate::error::CoreError::invalid_field(
                            $field,
                            format!("'{trimmed}' is not one of: {}", allowed.join(", ")),
                        )
                    })
            }
        }

        impl From<$name> for $crate::lookup::LookupId {
            fn from(value: $name) -> Self {
                value as $crate::lookup::LookupId
            }
        }

        impl TryFrom<$crate::lookup::LookupId> for $name {
            type Error = $crate::lookup::UnknownLookupId;

            fn try_from(id: $crate::lookup::LookupId) -> Result<Self, Self::Error> {
                Self::from_id(id).ok_or($crate::lookup::UnknownLookupId {
                    kind: stringify!($name),
                    id,
                })
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub(crate) use define_lookup_enum;
