use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Declares an opaque, string-backed identifier.
///
/// Identities are compared by value only; the store owns how they are minted.
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
            JsonSchema,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new<S: Into<String>>(value: S) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id!(
    /// Identity of a component (one package inside one project).
    ComponentId
);
string_id!(
    /// Identity of a project; projects form a parent tree.
    ProjectId
);
string_id!(PolicyId);
string_id!(ConditionId);
string_id!(LicenseGroupId);
