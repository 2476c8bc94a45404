use serde::{Deserialize, Deserializer};
use std::{fmt, str::FromStr};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
#[error("`{0}` is not a valid model id. Expected `<project>/<version>`.")]
pub struct ModelIdError(String);

/// Hosted model identifier of the form `<project>/<version>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelId {
    project: String,
    version: String,
}

impl ModelId {
    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}

impl FromStr for ModelId {
    type Err = ModelIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split('/').collect();
        match parts.as_slice() {
            [project, version] if !project.is_empty() && !version.is_empty() => Ok(Self {
                project: project.to_string(),
                version: version.to_string(),
            }),
            _ => Err(ModelIdError(s.to_string())),
        }
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.project, self.version)
    }
}

impl<'de> Deserialize<'de> for ModelId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
