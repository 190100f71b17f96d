use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Composite year + month identifier used to scope entries to "this month".
///
/// Rendered as `"{year}-{month}"` with a 1-based, unpadded month
/// (e.g. `"2024-3"`). Including the year keeps March 2024 and March 2025 apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey {
    pub year: i32,
    /// 1 = January … 12 = December
    pub month: u32,
}

impl MonthKey {
    /// Build a key, rejecting months outside 1–12.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// The month a calendar date falls in.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// First day of the month.
    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// Human label such as "March 2024".
    pub fn label(&self) -> String {
        self.first_day()
            .map(|d| d.format("%B %Y").to_string())
            .unwrap_or_else(|| self.to_string())
    }
}

impl std::fmt::Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.year, self.month)
    }
}

impl std::str::FromStr for MonthKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .trim()
            .rsplit_once('-')
            .ok_or_else(|| format!("month key '{s}' is not in YEAR-MONTH form"))?;
        let year: i32 = year
            .parse()
            .map_err(|_| format!("month key '{s}' has an invalid year"))?;
        let month: u32 = month
            .parse()
            .map_err(|_| format!("month key '{s}' has an invalid month"))?;
        MonthKey::new(year, month).ok_or_else(|| format!("month key '{s}' has month out of range"))
    }
}

impl TryFrom<String> for MonthKey {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MonthKey> for String {
    fn from(key: MonthKey) -> Self {
        key.to_string()
    }
}
