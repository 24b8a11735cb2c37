use std::fmt;

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Row identifier. The API mixes numeric and string ids across resources.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId(pub String);

impl RowId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RowId {
    fn from(value: &str) -> Self {
        RowId(value.to_string())
    }
}

impl From<i64> for RowId {
    fn from(value: i64) -> Self {
        RowId(value.to_string())
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(i64),
    Text(String),
}

impl<'de> Deserialize<'de> for RowId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawId::deserialize(deserializer)? {
            RawId::Number(n) => RowId(n.to_string()),
            RawId::Text(s) => RowId(s),
        })
    }
}

impl Serialize for RowId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0.parse::<i64>() {
            Ok(n) => serializer.serialize_i64(n),
            Err(_) => serializer.serialize_str(&self.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Income,
    Expense,
}

impl CategoryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CategoryKind::Income => "income",
            CategoryKind::Expense => "expense",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CategoryKind::Income => "Income",
            CategoryKind::Expense => "Expense",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "income" => Some(CategoryKind::Income),
            "expense" => Some(CategoryKind::Expense),
            _ => None,
        }
    }

    /// Amount as it affects the balance.
    pub fn signed(self, amount: f64) -> f64 {
        match self {
            CategoryKind::Income => amount,
            CategoryKind::Expense => -amount,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    pub const ALL: [Frequency; 4] = [
        Frequency::Daily,
        Frequency::Weekly,
        Frequency::Monthly,
        Frequency::Yearly,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Yearly => "yearly",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Frequency::Daily => "Daily",
            Frequency::Weekly => "Weekly",
            Frequency::Monthly => "Monthly",
            Frequency::Yearly => "Yearly",
        }
    }

    /// One step forward. Month steps keep the day, clamped to the month's end.
    pub fn advance(self, from: NaiveDate) -> Option<NaiveDate> {
        match self {
            Frequency::Daily => from.checked_add_days(Days::new(1)),
            Frequency::Weekly => from.checked_add_days(Days::new(7)),
            Frequency::Monthly => from.checked_add_months(Months::new(1)),
            Frequency::Yearly => from.checked_add_months(Months::new(12)),
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Frequency::ALL
            .into_iter()
            .find(|f| f.as_str() == value.trim().to_ascii_lowercase())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: RowId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CategoryKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedRef {
    pub id: RowId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: RowId,
    pub amount: f64,
    #[serde(default)]
    pub description: Option<String>,
    pub category: CategoryRef,
    #[serde(default)]
    pub payment_type: Option<NamedRef>,
    /// `YYYY-MM`.
    pub period: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: RowId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CategoryKind,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub cost_center_id: Option<RowId>,
    #[serde(default)]
    pub cost_center: Option<NamedRef>,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostCenter {
    pub id: RowId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentType {
    pub id: RowId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringEntry {
    pub id: RowId,
    pub amount: f64,
    #[serde(default)]
    pub description: String,
    pub frequency: Frequency,
    pub category: CategoryRef,
    #[serde(default)]
    pub payment_type: Option<NamedRef>,
    pub next_run: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: RowId,
    pub email: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    pub month: String,
    pub income: f64,
    pub expense: f64,
}

impl MonthlySummary {
    pub fn balance(&self) -> f64 {
        self.income - self.expense
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category_id: RowId,
    pub category_name: String,
    #[serde(rename = "type")]
    pub kind: CategoryKind,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotals {
    pub year: i32,
    pub month: u32,
    pub totals: Vec<CategoryTotal>,
}

impl MonthlyTotals {
    pub fn balance(&self) -> f64 {
        self.totals.iter().map(|t| t.kind.signed(t.total)).sum()
    }
}

pub fn yearly_balance(months: &[MonthlySummary]) -> f64 {
    months.iter().map(MonthlySummary::balance).sum()
}

/// Resolves `"category.type"` style paths through nested objects.
pub fn lookup_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(value, |current, segment| current.get(segment))
        .filter(|found| !found.is_null())
}

/// Display text of a raw JSON value. Strings lose their quotes; null is empty.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub fn row_id_of(row: &Value) -> Option<RowId> {
    lookup_path(row, "id").map(|id| RowId(value_text(id)))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn row_id_accepts_numbers_and_strings() {
        let numeric: RowId = serde_json::from_value(json!(42)).expect("number id should parse");
        let text: RowId = serde_json::from_value(json!("a1")).expect("string id should parse");

        assert_eq!(numeric, RowId::from("42"));
        assert_eq!(text, RowId::from("a1"));
        assert_eq!(serde_json::to_value(&numeric).expect("serialize"), json!(42));
        assert_eq!(serde_json::to_value(&text).expect("serialize"), json!("a1"));
    }

    #[test]
    fn entry_parses_nested_category() {
        let entry: Entry = serde_json::from_value(json!({
            "id": 7,
            "amount": 120.5,
            "category": {"id": 2, "name": "Rent", "type": "expense"},
            "user_id": 1,
            "period": "2024-03"
        }))
        .expect("entry should parse");

        assert_eq!(entry.category.kind, CategoryKind::Expense);
        assert_eq!(entry.description, None);
        assert!(entry.payment_type.is_none());
    }

    #[test]
    fn category_active_defaults_to_true() {
        let category: Category =
            serde_json::from_value(json!({"id": "c1", "name": "Salary", "type": "income"}))
                .expect("category should parse");

        assert!(category.active);
    }

    #[test]
    fn balances_sign_expenses() {
        let months = vec![
            MonthlySummary {
                month: "2024-01".into(),
                income: 1000.0,
                expense: 400.0,
            },
            MonthlySummary {
                month: "2024-02".into(),
                income: 200.0,
                expense: 900.0,
            },
        ];
        assert_eq!(yearly_balance(&months), -100.0);

        let totals = MonthlyTotals {
            year: 2024,
            month: 2,
            totals: vec![
                CategoryTotal {
                    category_id: RowId::from(1),
                    category_name: "Salary".into(),
                    kind: CategoryKind::Income,
                    total: 500.0,
                },
                CategoryTotal {
                    category_id: RowId::from(2),
                    category_name: "Rent".into(),
                    kind: CategoryKind::Expense,
                    total: 300.0,
                },
            ],
        };
        assert_eq!(totals.balance(), 200.0);
    }

    #[test]
    fn lookup_path_walks_nested_objects() {
        let row = json!({"id": 3, "category": {"name": "Rent", "type": "expense"}, "note": null});

        assert_eq!(
            lookup_path(&row, "category.type").map(value_text),
            Some("expense".to_string())
        );
        assert_eq!(lookup_path(&row, "category.missing"), None);
        assert_eq!(lookup_path(&row, "note"), None);
        assert_eq!(row_id_of(&row), Some(RowId::from("3")));
    }

    #[test]
    fn frequency_parses_case_insensitively() {
        assert_eq!(Frequency::parse("Monthly"), Some(Frequency::Monthly));
        assert_eq!(Frequency::parse("hourly"), None);
    }
}
