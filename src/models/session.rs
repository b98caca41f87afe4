//! Candidate session model.
//!
//! A session is an immutable, pre-scored record handed over by the
//! catalog and scoring stages. The planner never mutates it.
//!
//! # Time Representation
//! Times are wall-clock on `day`. Missing or unparseable times are kept
//! as `None` so that a single bad record does not reject a whole catalog;
//! such sessions are screened out as malformed.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;

use super::TimeWindow;

/// A scored candidate session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Unique session identifier (catalog code, e.g. "AIM301").
    pub id: String,
    /// Human-readable title.
    #[serde(default)]
    pub title: String,
    /// Conference day.
    pub day: NaiveDate,
    /// Start time. `None` = missing or unparseable.
    #[serde(default, with = "clock")]
    pub start: Option<NaiveTime>,
    /// End time. `None` = missing or unparseable.
    #[serde(default, with = "clock")]
    pub end: Option<NaiveTime>,
    /// Venue name.
    #[serde(default)]
    pub venue: String,
    /// Relevance score (higher = more desirable). NaN when missing.
    #[serde(default = "missing_score")]
    pub score: f64,
    /// Matched interest keywords.
    #[serde(default)]
    pub keywords: BTreeSet<String>,
    /// Upstream eligibility verdict.
    #[serde(default = "default_eligible")]
    pub eligible: bool,
}

fn default_eligible() -> bool {
    true
}

fn missing_score() -> f64 {
    f64::NAN
}

impl Session {
    /// Creates an eligible session with no times, venue or score.
    pub fn new(id: impl Into<String>, day: NaiveDate) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            day,
            start: None,
            end: None,
            venue: String::new(),
            score: 0.0,
            keywords: BTreeSet::new(),
            eligible: true,
        }
    }

    /// Sets the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets start and end times.
    pub fn with_times(mut self, start: NaiveTime, end: NaiveTime) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    /// Sets the venue.
    pub fn with_venue(mut self, venue: impl Into<String>) -> Self {
        self.venue = venue.into();
        self
    }

    /// Sets the relevance score.
    pub fn with_score(mut self, score: f64) -> Self {
        self.score = score;
        self
    }

    /// Adds a matched keyword.
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keywords.insert(keyword.into());
        self
    }

    /// Sets the upstream eligibility flag.
    pub fn with_eligible(mut self, eligible: bool) -> Self {
        self.eligible = eligible;
        self
    }

    /// The session's true window, if both times are present and `start < end`.
    pub fn window(&self) -> Option<TimeWindow> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => {
                Some(TimeWindow::from_times(start, end)).filter(TimeWindow::is_proper)
            }
            _ => None,
        }
    }

    /// Ranking order: descending score, then ascending start, then ascending id.
    ///
    /// Total for screened sessions (finite scores), so sorting with it is
    /// deterministic regardless of input order.
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| self.start.cmp(&other.start))
            .then_with(|| self.id.cmp(&other.id))
    }
}

/// Parses a wall-clock time given as `HH:MM` or `HH:MM:SS`.
pub fn parse_clock(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .ok()
}

/// Lenient `HH:MM` (de)serialization for optional times.
mod clock {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<NaiveTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(time) => serializer.serialize_str(&time.format("%H:%M").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveTime>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(super::parse_clock))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 12, 1).unwrap()
    }

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_session_builder() {
        let s = Session::new("AIM301", day())
            .with_title("Agents at scale")
            .with_times(hm(9, 0), hm(10, 0))
            .with_venue("Venetian")
            .with_score(0.8)
            .with_keyword("AI");

        assert_eq!(s.id, "AIM301");
        assert_eq!(s.venue, "Venetian");
        assert!(s.eligible);
        assert!(s.keywords.contains("AI"));
        assert_eq!(s.window(), Some(TimeWindow::new(540, 600)));
    }

    #[test]
    fn test_window_missing_or_inverted() {
        assert!(Session::new("A", day()).window().is_none());
        let inverted = Session::new("B", day()).with_times(hm(10, 0), hm(9, 0));
        assert!(inverted.window().is_none());
        let empty = Session::new("C", day()).with_times(hm(10, 0), hm(10, 0));
        assert!(empty.window().is_none());
    }

    #[test]
    fn test_rank_cmp() {
        let high = Session::new("Z", day()).with_score(0.9).with_times(hm(14, 0), hm(15, 0));
        let early = Session::new("Y", day()).with_score(0.5).with_times(hm(9, 0), hm(10, 0));
        let late_a = Session::new("A", day()).with_score(0.5).with_times(hm(10, 0), hm(11, 0));
        let late_b = Session::new("B", day()).with_score(0.5).with_times(hm(10, 0), hm(11, 0));

        let mut v = vec![late_b.clone(), late_a.clone(), early.clone(), high.clone()];
        v.sort_by(Session::rank_cmp);
        let ids: Vec<&str> = v.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["Z", "Y", "A", "B"]);
    }

    #[test]
    fn test_parse_clock() {
        assert_eq!(parse_clock("09:30"), Some(hm(9, 30)));
        assert_eq!(parse_clock(" 13:05:00 "), Some(hm(13, 5)));
        assert_eq!(parse_clock("9am"), None);
        assert_eq!(parse_clock(""), None);
    }

    #[test]
    fn test_deserialize_lenient_times() {
        let json = r#"{
            "id": "DEV201",
            "title": "Pipelines",
            "day": "2025-12-02",
            "start": "10:00",
            "end": "TBA",
            "venue": "Wynn",
            "score": 0.4,
            "keywords": ["DevOps"]
        }"#;
        let s: Session = serde_json::from_str(json).unwrap();
        assert_eq!(s.start, Some(hm(10, 0)));
        assert_eq!(s.end, None);
        assert!(s.eligible);
        assert!(s.window().is_none());
    }

    #[test]
    fn test_serialize_times() {
        let s = Session::new("A", day()).with_times(hm(9, 0), hm(10, 15));
        let value = serde_json::to_value(&s).unwrap();
        assert_eq!(value["start"], "09:00");
        assert_eq!(value["end"], "10:15");
        assert_eq!(value["day"], "2025-12-01");
    }
}
