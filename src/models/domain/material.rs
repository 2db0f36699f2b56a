use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Learning material attached to a sub-bab. Stored as the lowercase key of
/// `completedMaterials`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialType {
    Pdf,
    Video,
    Audio,
    Quiz,
}

impl MaterialType {
    pub const ALL: [MaterialType; 4] = [
        MaterialType::Pdf,
        MaterialType::Video,
        MaterialType::Audio,
        MaterialType::Quiz,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MaterialType::Pdf => "pdf",
            MaterialType::Video => "video",
            MaterialType::Audio => "audio",
            MaterialType::Quiz => "quiz",
        }
    }
}

impl fmt::Display for MaterialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MaterialType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(MaterialType::Pdf),
            "video" => Ok(MaterialType::Video),
            "audio" => Ok(MaterialType::Audio),
            "quiz" => Ok(MaterialType::Quiz),
            other => Err(AppError::ValidationError(format!(
                "Unknown material type '{}'",
                other
            ))),
        }
    }
}
