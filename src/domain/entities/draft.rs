use std::collections::BTreeMap;

use chrono::{Datelike, Months, NaiveDate};
use serde_json::{Map, Value};

use crate::domain::entities::record::{lookup_path, value_text, CategoryKind, Frequency};
use crate::domain::entities::resource::Resource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Amount,
    /// `YYYY-MM`
    Month,
    /// `YYYY-MM-DD`
    Date,
    Kind,
    Frequency,
    /// Id of a row of another resource, chosen from its list.
    Reference(Resource),
    Flag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// Paths tried in order when loading an existing record into a draft.
    pub sources: &'static [&'static str],
    /// Flag field that must be checked for this field to show and be sent.
    pub shown_when: Option<&'static str>,
}

const fn field(
    name: &'static str,
    label: &'static str,
    kind: FieldKind,
    required: bool,
    sources: &'static [&'static str],
) -> FieldSpec {
    FieldSpec {
        name,
        label,
        kind,
        required,
        sources,
        shown_when: None,
    }
}

impl FieldSpec {
    const fn when_checked(self, flag: &'static str) -> Self {
        FieldSpec {
            shown_when: Some(flag),
            ..self
        }
    }
}

const ENTRY_FIELDS: &[FieldSpec] = &[
    field("amount", "Amount", FieldKind::Amount, true, &["amount"]),
    field("description", "Description", FieldKind::Text, false, &["description"]),
    field(
        "category_id",
        "Category",
        FieldKind::Reference(Resource::Categories),
        true,
        &["category_id", "category.id"],
    ),
    field(
        "payment_type_id",
        "Payment type",
        FieldKind::Reference(Resource::PaymentTypes),
        false,
        &["payment_type_id", "payment_type.id"],
    ),
    field("period", "Period", FieldKind::Month, true, &["period"]),
    field("recurring", "Recurring", FieldKind::Flag, false, &["recurring"]),
    field("frequency", "Frequency", FieldKind::Frequency, true, &["frequency"])
        .when_checked("recurring"),
];

const CATEGORY_FIELDS: &[FieldSpec] = &[
    field("name", "Name", FieldKind::Text, true, &["name"]),
    field("type", "Type", FieldKind::Kind, true, &["type"]),
    field(
        "cost_center_id",
        "Cost center",
        FieldKind::Reference(Resource::CostCenters),
        false,
        &["cost_center_id", "cost_center.id"],
    ),
    field("active", "Active", FieldKind::Flag, false, &["active"]),
];

const NAME_ONLY_FIELDS: &[FieldSpec] = &[field("name", "Name", FieldKind::Text, true, &["name"])];

const RECURRING_FIELDS: &[FieldSpec] = &[
    field("amount", "Amount", FieldKind::Amount, true, &["amount"]),
    field("description", "Description", FieldKind::Text, false, &["description"]),
    field(
        "category_id",
        "Category",
        FieldKind::Reference(Resource::Categories),
        true,
        &["category_id", "category.id"],
    ),
    field(
        "payment_type_id",
        "Payment type",
        FieldKind::Reference(Resource::PaymentTypes),
        false,
        &["payment_type_id", "payment_type.id"],
    ),
    field("frequency", "Frequency", FieldKind::Frequency, true, &["frequency"]),
    field("next_run", "Next run", FieldKind::Date, true, &["next_run"]),
];

pub fn form_fields(resource: Resource) -> &'static [FieldSpec] {
    match resource {
        Resource::Entries => ENTRY_FIELDS,
        Resource::Categories => CATEGORY_FIELDS,
        Resource::CostCenters | Resource::PaymentTypes => NAME_ONLY_FIELDS,
        Resource::RecurringEntries => RECURRING_FIELDS,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldIssue {
    #[error("is required")]
    Required,
    #[error("must be a number")]
    NotANumber,
    #[error("must be greater than 0")]
    NotPositive,
    #[error("must look like YYYY-MM")]
    BadMonth,
    #[error("must be a valid date")]
    BadDate,
    #[error("has an unknown value")]
    UnknownChoice,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{label} {issue}")]
pub struct ValidationError {
    pub field: &'static str,
    pub label: &'static str,
    pub issue: FieldIssue,
}

/// Raw text of every form input, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    values: BTreeMap<String, String>,
}

impl Draft {
    /// Empty form with the defaults a new record starts from.
    pub fn blank(resource: Resource, today: NaiveDate) -> Self {
        let mut draft = Draft::default();
        match resource {
            Resource::Entries => {
                draft.set("period", today.format("%Y-%m").to_string());
                draft.set("frequency", Frequency::Monthly.as_str());
            }
            Resource::Categories => {
                draft.set("type", CategoryKind::Expense.as_str());
                draft.set("active", "true");
            }
            Resource::RecurringEntries => {
                draft.set("frequency", Frequency::Monthly.as_str());
                draft.set("next_run", today.format("%Y-%m-%d").to_string());
            }
            Resource::CostCenters | Resource::PaymentTypes => {}
        }
        draft
    }

    pub fn from_record(resource: Resource, record: &Value) -> Self {
        let mut draft = Draft::default();
        for spec in form_fields(resource) {
            let found = spec
                .sources
                .iter()
                .find_map(|path| lookup_path(record, path));
            if let Some(value) = found {
                draft.set(spec.name, value_text(value));
            }
        }
        if resource == Resource::Entries && draft.get("frequency").is_empty() {
            draft.set("frequency", Frequency::Monthly.as_str());
        }
        draft
    }

    pub fn is_shown(&self, spec: &FieldSpec) -> bool {
        spec.shown_when.map_or(true, |flag| is_checked(self.get(flag)))
    }

    pub fn get(&self, name: &str) -> &str {
        self.values.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.values.insert(name.to_string(), value.into());
    }
}

fn is_checked(raw: &str) -> bool {
    matches!(raw.trim(), "true" | "on" | "1")
}

/// Checks every shown field and builds the request payload (without `id`).
/// All problems are reported, in form order. Cleared optional fields are sent
/// as `""` or `null` so an update overwrites them. A recurring entry also
/// gets its `next_run`, scheduled from `today`.
pub fn validate_draft(
    resource: Resource,
    draft: &Draft,
    today: NaiveDate,
) -> Result<Value, Vec<ValidationError>> {
    let mut payload = Map::new();
    let mut errors = Vec::new();

    for spec in form_fields(resource).iter().filter(|spec| draft.is_shown(spec)) {
        match validate_field(spec, draft.get(spec.name)) {
            Ok(value) => {
                payload.insert(spec.name.to_string(), value);
            }
            Err(issue) => errors.push(ValidationError {
                field: spec.name,
                label: spec.label,
                issue,
            }),
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }
    if resource == Resource::Entries && payload.get("recurring") == Some(&Value::Bool(true)) {
        let next_run = payload
            .get("period")
            .and_then(Value::as_str)
            .zip(payload.get("frequency").and_then(Value::as_str).and_then(Frequency::parse))
            .and_then(|(period, frequency)| next_run_for(period, today, frequency));
        if let Some(date) = next_run {
            payload.insert(
                "next_run".to_string(),
                Value::String(date.format("%Y-%m-%d").to_string()),
            );
        }
    }
    Ok(Value::Object(payload))
}

/// First run of an entry repeating from `period` (`YYYY-MM`): today's day of
/// the month inside that period, clamped to its last day, advanced once by
/// `frequency`.
pub fn next_run_for(period: &str, today: NaiveDate, frequency: Frequency) -> Option<NaiveDate> {
    let first = NaiveDate::parse_from_str(&format!("{}-01", period.trim()), "%Y-%m-%d").ok()?;
    let last_day = first.checked_add_months(Months::new(1))?.pred_opt()?.day();
    let start = first.with_day(today.day().min(last_day))?;
    frequency.advance(start)
}

fn validate_field(spec: &FieldSpec, raw: &str) -> Result<Value, FieldIssue> {
    let raw = raw.trim();
    if raw.is_empty() {
        return match (spec.kind, spec.required) {
            (FieldKind::Flag, _) => Ok(Value::Bool(false)),
            (_, true) => Err(FieldIssue::Required),
            (FieldKind::Text, false) => Ok(Value::String(String::new())),
            (_, false) => Ok(Value::Null),
        };
    }

    let value = match spec.kind {
        FieldKind::Text => Value::String(raw.to_string()),
        FieldKind::Amount => {
            let amount: f64 = raw
                .replace(',', ".")
                .parse()
                .map_err(|_| FieldIssue::NotANumber)?;
            if !amount.is_finite() {
                return Err(FieldIssue::NotANumber);
            }
            if amount <= 0.0 {
                return Err(FieldIssue::NotPositive);
            }
            serde_json::Number::from_f64(amount)
                .map(Value::Number)
                .ok_or(FieldIssue::NotANumber)?
        }
        FieldKind::Month => {
            let valid = raw.len() == 7
                && NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d").is_ok();
            if !valid {
                return Err(FieldIssue::BadMonth);
            }
            Value::String(raw.to_string())
        }
        FieldKind::Date => {
            let date =
                NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| FieldIssue::BadDate)?;
            Value::String(date.format("%Y-%m-%d").to_string())
        }
        FieldKind::Kind => {
            let kind = CategoryKind::parse(raw).ok_or(FieldIssue::UnknownChoice)?;
            Value::String(kind.as_str().to_string())
        }
        FieldKind::Frequency => {
            let frequency = Frequency::parse(raw).ok_or(FieldIssue::UnknownChoice)?;
            Value::String(frequency.as_str().to_string())
        }
        FieldKind::Reference(_) => match raw.parse::<i64>() {
            Ok(n) => Value::from(n),
            Err(_) => Value::String(raw.to_string()),
        },
        FieldKind::Flag => Value::Bool(is_checked(raw)),
    };
    Ok(value)
}
