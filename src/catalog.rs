//! Session catalog loading.
//!
//! A catalog is a JSON array of scored sessions as produced by the
//! scoring stage. Records with bad or missing times, or a missing score,
//! still load; the planner screens them out later.

use std::path::Path;
use thiserror::Error;

use crate::models::Session;

/// Catalog errors
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read session catalog: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse session catalog: {0}")]
    ParseError(#[from] serde_json::Error),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Load sessions from a JSON file
pub fn load_sessions(path: impl AsRef<Path>) -> CatalogResult<Vec<Session>> {
    let content = std::fs::read_to_string(path)?;
    parse_sessions(&content)
}

/// Parse sessions from a JSON string
pub fn parse_sessions(content: &str) -> CatalogResult<Vec<Session>> {
    Ok(serde_json::from_str(content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_catalog() {
        let json = r#"[
            {
                "id": "AIM301",
                "title": "Agents in production",
                "day": "2025-12-02",
                "start": "09:00",
                "end": "10:00",
                "venue": "Venetian",
                "score": 0.82,
                "keywords": ["AI"]
            },
            {
                "id": "DEV210",
                "day": "2025-12-03",
                "start": "TBA",
                "score": 0.4,
                "eligible": false
            }
        ]"#;

        let sessions = parse_sessions(json).unwrap();
        assert_eq!(sessions.len(), 2);
        assert!(sessions[0].window().is_some());
        assert!(sessions[0].eligible);
        assert!(sessions[0].keywords.contains("AI"));
        assert_eq!(sessions[1].start, None);
        assert_eq!(sessions[1].end, None);
        assert!(!sessions[1].eligible);
    }

    #[test]
    fn test_missing_score_screened_not_fatal() {
        let json = r#"[
            {"id": "A", "day": "2025-12-01", "start": "09:00", "end": "10:00", "score": 0.9},
            {"id": "B", "day": "2025-12-01", "start": "09:00", "end": "10:00"}
        ]"#;
        let sessions = parse_sessions(json).unwrap();
        assert_eq!(sessions.len(), 2);
        assert!(sessions[1].score.is_nan());

        let config = crate::config::PlannerConfig::default();
        let issues = crate::validation::validate_sessions(&sessions, &config).unwrap_err();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].session_id, "B");
        assert_eq!(issues[0].kind, crate::validation::SessionIssueKind::NonFiniteScore);
    }

    #[test]
    fn test_parse_rejects_non_array() {
        assert!(matches!(
            parse_sessions(r#"{"id": "X"}"#),
            Err(CatalogError::ParseError(_))
        ));
    }

    #[test]
    fn test_load_catalog_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id": "A", "day": "2025-12-01", "start": "13:30", "end": "14:30", "score": 0.5}}]"#
        )
        .unwrap();

        let sessions = load_sessions(file.path()).unwrap();
        assert_eq!(sessions[0].id, "A");
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            load_sessions("/nonexistent/sessions.json"),
            Err(CatalogError::ReadError(_))
        ));
    }
}
