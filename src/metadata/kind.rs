use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Observation metadata after interpretation: either the raw string or a
/// list of its `;`-separated parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ObservationMetadata {
    Text(String),
    List(Vec<String>),
}

/// How a free-text metadata value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ObservationMetadataType {
    /// Keep the string as is.
    #[default]
    Naive,
    /// Split on `;` and trim each part.
    ScSeparated,
    /// Same as [`ScSeparated`](Self::ScSeparated), for lineage strings.
    Taxonomy,
}

impl ObservationMetadataType {
    pub fn as_str(self) -> &'static str {
        match self {
            ObservationMetadataType::Naive => "naive",
            ObservationMetadataType::ScSeparated => "sc_separated",
            ObservationMetadataType::Taxonomy => "taxonomy",
        }
    }

    pub fn apply(self, raw: &str) -> ObservationMetadata {
        match self {
            ObservationMetadataType::Naive => ObservationMetadata::Text(raw.to_string()),
            ObservationMetadataType::ScSeparated | ObservationMetadataType::Taxonomy => {
                ObservationMetadata::List(raw.split(';').map(|part| part.trim().to_string()).collect())
            }
        }
    }
}

impl FromStr for ObservationMetadataType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "naive" => Ok(ObservationMetadataType::Naive),
            "sc_separated" => Ok(ObservationMetadataType::ScSeparated),
            "taxonomy" => Ok(ObservationMetadataType::Taxonomy),
            other => Err(Error::malformed(format!(
                "unknown observation metadata type {other:?}"
            ))),
        }
    }
}

impl fmt::Display for ObservationMetadataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
