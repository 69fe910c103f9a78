//! Rule-based query classification

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coarse intent of a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryCategory {
    Definition,
    Comparison,
    Summarization,
    Question,
    General,
}

impl QueryCategory {
    pub const ALL: [QueryCategory; 5] = [
        Self::Definition,
        Self::Comparison,
        Self::Summarization,
        Self::Question,
        Self::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Definition => "definition",
            Self::Comparison => "comparison",
            Self::Summarization => "summarization",
            Self::Question => "question",
            Self::General => "general",
        }
    }
}

impl fmt::Display for QueryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueryCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "unknown query category '{}' (expected one of: definition, comparison, summarization, question, general)",
                    s
                )
            })
    }
}

/// Classify a query by substring rules over its lowercased text
///
/// Rules are checked in order and the first match wins, so
/// "what is the summary?" is a definition, not a summarization.
/// Matching is plain substring search: "vs" also fires inside "devs".
pub fn classify_query(query: &str) -> QueryCategory {
    let q = query.to_lowercase();

    if q.starts_with("define") || q.contains("what is") {
        QueryCategory::Definition
    } else if q.contains("compare") || q.contains("vs") {
        QueryCategory::Comparison
    } else if q.contains("summarize") || q.contains("summary") {
        QueryCategory::Summarization
    } else if q.trim().ends_with('?') {
        QueryCategory::Question
    } else {
        QueryCategory::General
    }
}
