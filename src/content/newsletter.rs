//! Newsletter archive records

use serde::{Deserialize, Serialize};

/// One archived newsletter issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Newsletter {
    pub year: i32,
    /// Calendar month, 1 through 12
    pub month: u32,
    /// Path of the downloadable file
    pub file: String,
}

/// The newsletters index resource
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewsletterIndex {
    #[serde(default)]
    pub newsletters: Vec<Newsletter>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_index() {
        let json = r#"{"newsletters": [
            {"year": 2025, "month": 3, "file": "newsletters/2025-03.pdf"},
            {"year": 2024, "month": 12, "file": "newsletters/2024-12.pdf"}
        ]}"#;
        let index: NewsletterIndex = serde_json::from_str(json).unwrap();
        assert_eq!(index.newsletters.len(), 2);
        assert_eq!(index.newsletters[0].month, 3);
    }

    #[test]
    fn test_missing_field_defaults_empty() {
        let index: NewsletterIndex = serde_json::from_str("{}").unwrap();
        assert!(index.newsletters.is_empty());
    }
}
