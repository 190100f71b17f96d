use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::lenient;
use super::month::MonthKey;

/// Spending category. Unknown tags, `null` and non-string values fall back
/// to `Other` instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
#[serde(into = "String")]
pub enum Category {
    Food,
    Groceries,
    Transport,
    Housing,
    Utilities,
    Health,
    Entertainment,
    Shopping,
    Education,
    #[default]
    Other,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 10] = [
        Category::Food,
        Category::Groceries,
        Category::Transport,
        Category::Housing,
        Category::Utilities,
        Category::Health,
        Category::Entertainment,
        Category::Shopping,
        Category::Education,
        Category::Other,
    ];

    /// Lowercase storage tag.
    pub fn tag(&self) -> &'static str {
        match self {
            Category::Food => "food",
            Category::Groceries => "groceries",
            Category::Transport => "transport",
            Category::Housing => "housing",
            Category::Utilities => "utilities",
            Category::Health => "health",
            Category::Entertainment => "entertainment",
            Category::Shopping => "shopping",
            Category::Education => "education",
            Category::Other => "other",
        }
    }

    /// Parse a tag case-insensitively; unknown or empty tags map to `Other`.
    pub fn from_tag(tag: &str) -> Self {
        let tag = tag.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.tag().eq_ignore_ascii_case(tag))
            .unwrap_or(Category::Other)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Category::Food => "Food",
            Category::Groceries => "Groceries",
            Category::Transport => "Transport",
            Category::Housing => "Housing",
            Category::Utilities => "Utilities",
            Category::Health => "Health",
            Category::Entertainment => "Entertainment",
            Category::Shopping => "Shopping",
            Category::Education => "Education",
            Category::Other => "Other",
        };
        write!(f, "{label}")
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(tag) => Category::from_tag(&tag),
            _ => Category::Other,
        })
    }
}

impl From<String> for Category {
    fn from(tag: String) -> Self {
        Category::from_tag(&tag)
    }
}

impl From<&str> for Category {
    fn from(tag: &str) -> Self {
        Category::from_tag(tag)
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.tag().to_string()
    }
}

/// A single spending entry.
///
/// `month` is captured from `date` at creation and is what monthly views
/// filter on; it is never recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    #[serde(default = "Uuid::new_v4", deserialize_with = "lenient::id")]
    pub id: Uuid,

    /// Amount spent (always positive)
    #[serde(default, deserialize_with = "lenient::number")]
    pub amount: f64,

    #[serde(default)]
    pub category: Category,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    pub date: NaiveDate,

    pub month: MonthKey,

    /// Counted towards shared household spending
    #[serde(default, deserialize_with = "lenient::flag")]
    pub shared: bool,
}

impl Expense {
    pub fn new(amount: f64, category: Category, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            amount,
            category,
            note: None,
            date,
            month: MonthKey::from_date(date),
            shared: false,
        }
    }

    /// Create an expense with a note attached. Blank notes are dropped.
    pub fn with_note(
        amount: f64,
        category: Category,
        date: NaiveDate,
        note: impl Into<String>,
    ) -> Self {
        let note = note.into();
        Self {
            note: (!note.trim().is_empty()).then_some(note),
            ..Self::new(amount, category, date)
        }
    }
}
