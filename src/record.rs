use serde::{Deserialize, Serialize};

/// One scraped archive page, as persisted to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveRecord {
    pub title: String,
    /// ISO-8601 timestamp, taken from the page or from the extraction clock.
    pub date: String,
    pub text_content: String,
    pub links: Vec<ArchiveLink>,
    pub debug_info: DebugInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveLink {
    pub text: String,
    pub url: String,
    /// Up to 100 characters of the anchor's parent element text.
    pub context: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugInfo {
    pub source_url: String,
    pub extraction_status: ExtractionStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionStatus {
    Success,
    Failed,
}

impl ExtractionStatus {
    #[inline]
    pub fn from_text(text: &str) -> Self {
        if text.is_empty() {
            Self::Failed
        } else {
            Self::Success
        }
    }
}
