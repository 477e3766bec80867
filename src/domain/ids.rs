//! Domain identifier types with validation
//!
//! Newtype wrappers for the opaque identifiers Qualtrics hands back.
//! Qualtrics prefixes its IDs by kind (`SV_` for surveys, `IM_` for graphics,
//! `UR_`/`GR_` for libraries) but the prefixes are not enforced here; the
//! service is the authority on what it accepts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! qualtrics_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, rejecting blank values
            pub fn new(id: impl Into<String>) -> Result<Self, String> {
                let id = id.into();
                if id.trim().is_empty() {
                    return Err(concat!($label, " cannot be empty").to_string());
                }
                Ok(Self(id))
            }

            /// Returns the identifier as a string slice
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consumes self and returns the inner String
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

qualtrics_id!(
    /// Survey identifier (`SV_*`)
    ///
    /// ```
    /// use qualtrics_tagger::domain::ids::SurveyId;
    /// use std::str::FromStr;
    ///
    /// let id = SurveyId::from_str("SV_0ApBnQ7VP2cHWvz").unwrap();
    /// assert_eq!(id.as_str(), "SV_0ApBnQ7VP2cHWvz");
    /// ```
    SurveyId,
    "Survey ID"
);

qualtrics_id!(
    /// Response export job identifier
    ExportId,
    "Export ID"
);

qualtrics_id!(
    /// Uploaded graphic identifier (`IM_*`)
    GraphicId,
    "Graphic ID"
);

qualtrics_id!(
    /// Graphics library identifier (`UR_*` for user libraries, `GR_*` for groups)
    LibraryId,
    "Library ID"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_survey_id_valid() {
        let id = SurveyId::new("SV_abc").unwrap();
        assert_eq!(id.as_str(), "SV_abc");
        assert_eq!(id.to_string(), "SV_abc");
    }

    #[test]
    fn test_ids_reject_blank() {
        assert_eq!(SurveyId::new("").unwrap_err(), "Survey ID cannot be empty");
        assert!(ExportId::new("   ").is_err());
        assert!(GraphicId::from_str("").is_err());
        assert_eq!(LibraryId::new(" ").unwrap_err(), "Library ID cannot be empty");
    }

    #[test]
    fn test_id_serializes_transparently() {
        let id = GraphicId::new("IM_123").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"IM_123\"");
        let back: GraphicId = serde_json::from_str("\"IM_123\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_into_inner() {
        let id = ExportId::new("ES_42").unwrap();
        assert_eq!(id.into_inner(), "ES_42".to_string());
    }
}
