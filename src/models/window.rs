use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AnalysisError;

/// Meteorological season, anchored so a year of windows begins in December.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Autumn,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Winter, Season::Spring, Season::Summer, Season::Autumn];

    /// First month of the season's quarter (December-anchored).
    pub fn start_month(&self) -> u32 {
        match self {
            Season::Winter => 12,
            Season::Spring => 3,
            Season::Summer => 6,
            Season::Autumn => 9,
        }
    }

    /// The three calendar months covered by the season.
    pub fn months(&self) -> [u32; 3] {
        match self {
            Season::Winter => [12, 1, 2],
            Season::Spring => [3, 4, 5],
            Season::Summer => [6, 7, 8],
            Season::Autumn => [9, 10, 11],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Season::Winter => "winter",
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Autumn => "autumn",
        }
    }
}

/// Partition key for extremum extraction: one extremum per calendar year,
/// per occurrence of a named season, or per occurrence of a calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalysisWindow {
    Year,
    Season(Season),
    Month(u32),
}

impl AnalysisWindow {
    pub fn label(&self) -> String {
        match self {
            AnalysisWindow::Year => "year".to_string(),
            AnalysisWindow::Season(s) => s.label().to_string(),
            AnalysisWindow::Month(m) => format!("month {}", m),
        }
    }
}

impl fmt::Display for AnalysisWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Accepted tokens: `year`, a season name or its abbreviation
/// (`W`, `SP`, `SU`, `A`, case-insensitive), or a month number in 1..=12.
impl FromStr for AnalysisWindow {
    type Err = AnalysisError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let trimmed = token.trim();
        let lower = trimmed.to_ascii_lowercase();

        match lower.as_str() {
            "year" => return Ok(AnalysisWindow::Year),
            "winter" | "w" => return Ok(AnalysisWindow::Season(Season::Winter)),
            "spring" | "sp" => return Ok(AnalysisWindow::Season(Season::Spring)),
            "summer" | "su" => return Ok(AnalysisWindow::Season(Season::Summer)),
            "autumn" | "a" => return Ok(AnalysisWindow::Season(Season::Autumn)),
            _ => {}
        }

        match trimmed.parse::<u32>() {
            Ok(month) if (1..=12).contains(&month) => Ok(AnalysisWindow::Month(month)),
            _ => Err(AnalysisError::InvalidWindow(token.to_string())),
        }
    }
}
