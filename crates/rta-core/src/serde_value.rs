use serde::{Deserialize, Serialize};

use crate::core::Document;

pub const DOCUMENT_SCHEMA: &str = "rta-core";
pub const DOCUMENT_VERSION: u32 = 1;

fn default_schema() -> String {
    DOCUMENT_SCHEMA.to_string()
}

fn default_version() -> u32 {
    DOCUMENT_VERSION
}

#[derive(Debug)]
pub enum ValueError {
    Json(serde_json::Error),
    UnsupportedSchema(String),
    UnsupportedVersion(u32),
}

impl std::fmt::Display for ValueError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueError::Json(err) => write!(f, "malformed document value: {err}"),
            ValueError::UnsupportedSchema(schema) => write!(f, "unsupported schema: {schema}"),
            ValueError::UnsupportedVersion(version) => {
                write!(f, "unsupported version {version}, expected {DOCUMENT_VERSION}")
            }
        }
    }
}

impl std::error::Error for ValueError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ValueError::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ValueError {
    fn from(value: serde_json::Error) -> Self {
        ValueError::Json(value)
    }
}

/// Versioned JSON envelope a host stores a [`Document`] in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentValue {
    #[serde(default = "default_schema")]
    pub schema: String,
    #[serde(default = "default_version")]
    pub version: u32,
    pub document: Document,
}

impl DocumentValue {
    pub fn from_document(document: Document) -> Self {
        Self {
            schema: default_schema(),
            version: default_version(),
            document,
        }
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parses an envelope, rejecting other schemas and newer versions.
    pub fn from_json_str(s: &str) -> Result<Self, ValueError> {
        let value: Self = serde_json::from_str(s)?;
        if value.schema != DOCUMENT_SCHEMA {
            return Err(ValueError::UnsupportedSchema(value.schema));
        }
        if value.version > DOCUMENT_VERSION {
            return Err(ValueError::UnsupportedVersion(value.version));
        }
        Ok(value)
    }
}
