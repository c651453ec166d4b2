//! Newtype IDs for type-safe entity references.
//!
//! Identifiers are issued by the backend and are opaque to the portal, so
//! every ID wraps a `String`. Use the `define_id!` macro to create wrappers
//! that prevent accidentally mixing IDs from different entity types.

/// Errors that can occur when parsing an identifier.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    /// The input string is empty or only whitespace.
    #[error("identifier cannot be empty")]
    Empty,
    /// The input contains a path separator or control character.
    #[error("identifier contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// Macro to define a type-safe opaque ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - `parse()` which rejects empty input and characters that would break
///   URL path segments
/// - `as_str()`, `into_inner()`, `Display`, `FromStr`, `AsRef<str>`
///
/// # Example
///
/// ```rust
/// # use clearpath_core::define_id;
/// define_id!(LessonId);
/// define_id!(SurveyId);
///
/// let lesson = LessonId::parse("L-1").unwrap();
/// let survey = SurveyId::parse("L-1").unwrap();
///
/// // These are different types, so this won't compile:
/// // let _: LessonId = survey;
/// # let _ = (lesson, survey);
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Parse an ID from a string.
            ///
            /// # Errors
            ///
            /// Returns an error if the input is blank or contains `/`, `?`,
            /// `#`, `\` or a control character.
            pub fn parse(s: &str) -> ::core::result::Result<Self, $crate::types::id::IdError> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err($crate::types::id::IdError::Empty);
                }
                if let Some(c) = trimmed
                    .chars()
                    .find(|c| matches!(c, '/' | '?' | '#' | '\\') || c.is_control())
                {
                    return Err($crate::types::id::IdError::InvalidCharacter(c));
                }
                Ok(Self(trimmed.to_owned()))
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = $crate::types::id::IdError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// Define standard entity IDs
define_id!(UserId);
define_id!(CourseId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_whitespace() {
        let id = UserId::parse("  m-42 ").unwrap();
        assert_eq!(id.as_str(), "m-42");
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(UserId::parse(""), Err(IdError::Empty));
        assert_eq!(UserId::parse("   "), Err(IdError::Empty));
    }

    #[test]
    fn test_parse_rejects_path_characters() {
        assert_eq!(
            CourseId::parse("1/../2"),
            Err(IdError::InvalidCharacter('/'))
        );
        assert_eq!(
            CourseId::parse("1?x=2"),
            Err(IdError::InvalidCharacter('?'))
        );
    }

    #[test]
    fn test_serde_transparent() {
        let id: UserId = serde_json::from_str("\"u-7\"").unwrap();
        assert_eq!(id.to_string(), "u-7");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"u-7\"");
    }
}
