//! Route value types shared by the rewriter, parser and resolver.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Response format requested through the path suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ApiFormat {
    #[default]
    Json,
    Xml,
}

impl ApiFormat {
    pub const ALL: [ApiFormat; 2] = [ApiFormat::Json, ApiFormat::Xml];

    pub fn as_str(self) -> &'static str {
        match self {
            ApiFormat::Json => "json",
            ApiFormat::Xml => "xml",
        }
    }

    /// Form used inside handler ids.
    pub fn title(self) -> &'static str {
        match self {
            ApiFormat::Json => "Json",
            ApiFormat::Xml => "Xml",
        }
    }

    /// Path suffix that selects this format.
    pub fn suffix(self) -> &'static str {
        match self {
            ApiFormat::Json => ".json",
            ApiFormat::Xml => ".xml",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ApiFormat::Json => "application/json; charset=utf-8",
            ApiFormat::Xml => "application/xml; charset=utf-8",
        }
    }
}

impl fmt::Display for ApiFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApiFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ApiFormat::Json),
            "xml" => Ok(ApiFormat::Xml),
            _ => Err(()),
        }
    }
}

/// Everything the pipeline learned from the path.
///
/// Built once per request and never mutated after resolution starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedRoute {
    pub api_version: String,
    pub api_format: ApiFormat,
    pub resource_name: String,
    pub action: Option<String>,
    pub remaining_path: String,
}
