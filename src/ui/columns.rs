use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;

use crate::domain::entities::page::ListPage;
use crate::domain::entities::record::{
    Category, CategoryKind, CostCenter, Entry, Frequency, PaymentType, RecurringEntry,
};
use crate::domain::entities::resource::Resource;
use crate::domain::entities::sort::SortState;
use crate::ui::grid::{build_grid_view, money_cell, Align, Cell, ColumnSpec, GridRow, GridView, Tone};

pub fn resource_columns(resource: Resource) -> Vec<ColumnSpec<Value>> {
    match resource {
        Resource::Entries => vec![
            ColumnSpec::new("period", "Period")
                .sortable()
                .width("180px")
                .render(entry_period),
            ColumnSpec::new("amount", "Amount")
                .align(Align::Right)
                .width("140px")
                .render(entry_amount),
            ColumnSpec::new("category.name", "Category")
                .sortable()
                .width("160px"),
            ColumnSpec::new("category.type", "Type")
                .sortable()
                .width("120px")
                .render(category_kind_badge),
            ColumnSpec::new("description", "Description"),
        ],
        Resource::Categories => vec![
            ColumnSpec::new("name", "Name").sortable().width("250px"),
            ColumnSpec::new("type", "Type")
                .sortable()
                .render(category_kind_badge),
        ],
        Resource::CostCenters | Resource::PaymentTypes => {
            vec![ColumnSpec::new("name", "Name").sortable()]
        }
        Resource::RecurringEntries => vec![
            ColumnSpec::new("frequency", "Frequency")
                .sortable()
                .width("120px")
                .render(recurring_frequency),
            ColumnSpec::new("amount", "Amount")
                .align(Align::Right)
                .width("140px")
                .render(recurring_amount),
            ColumnSpec::new("category.name", "Category").sortable(),
            ColumnSpec::new("category.type", "Type")
                .sortable()
                .render(category_kind_badge),
            ColumnSpec::new("next_run", "Next run")
                .sortable()
                .width("130px")
                .render(recurring_next_run),
            ColumnSpec::new("description", "Description").sortable(),
        ],
    }
}

pub fn build_resource_view(
    resource: Resource,
    page: &ListPage<Value>,
    sort: &SortState,
) -> GridView {
    build_grid_view(&resource_columns(resource), page, sort)
}

fn raw(row: &Value, path: &str) -> Cell {
    Cell::plain(row.field_text(path).unwrap_or_default())
}

/// `2024-03` as `March 2024`.
pub fn month_label(period: &str) -> Option<String> {
    NaiveDate::parse_from_str(&format!("{period}-01"), "%Y-%m-%d")
        .ok()
        .map(|date| date.format("%B %Y").to_string())
}

fn entry_period(row: &Value) -> Cell {
    match row.field_text("period").as_deref().and_then(month_label) {
        Some(label) => Cell::plain(label),
        None => raw(row, "period"),
    }
}

fn entry_amount(row: &Value) -> Cell {
    match Entry::deserialize(row) {
        Ok(entry) => money_cell(entry.category.kind.signed(entry.amount)),
        Err(_) => raw(row, "amount"),
    }
}

fn recurring_amount(row: &Value) -> Cell {
    match RecurringEntry::deserialize(row) {
        Ok(recurring) => money_cell(recurring.category.kind.signed(recurring.amount)),
        Err(_) => raw(row, "amount"),
    }
}

fn recurring_frequency(row: &Value) -> Cell {
    match row.field_text("frequency").as_deref().and_then(Frequency::parse) {
        Some(frequency) => Cell::plain(frequency.label()),
        None => raw(row, "frequency"),
    }
}

fn recurring_next_run(row: &Value) -> Cell {
    let text = row.field_text("next_run").unwrap_or_default();
    match NaiveDate::parse_from_str(text.get(..10).unwrap_or(&text), "%Y-%m-%d") {
        Ok(date) => Cell::plain(date.format("%d/%m/%Y").to_string()),
        Err(_) => Cell::toned(text, Tone::Muted),
    }
}

/// Works for both nested (`category.type`) and flat (`type`) rows.
fn category_kind_badge(row: &Value) -> Cell {
    let kind = row
        .field_text("category.type")
        .or_else(|| row.field_text("type"))
        .as_deref()
        .and_then(CategoryKind::parse);
    match kind {
        Some(CategoryKind::Income) => Cell::toned(CategoryKind::Income.label(), Tone::Positive),
        Some(CategoryKind::Expense) => Cell::toned(CategoryKind::Expense.label(), Tone::Negative),
        None => Cell::toned("-", Tone::Muted),
    }
}

/// Text for a select option of a lookup row: categories carry their type.
pub fn option_label(resource: Resource, row: &Value) -> String {
    let typed = match resource {
        Resource::Categories => Category::deserialize(row).ok().map(|category| {
            let mut label = format!("{} ({})", category.name, category.kind.label());
            if !category.active {
                label.push_str(", inactive");
            }
            label
        }),
        Resource::CostCenters => CostCenter::deserialize(row).ok().map(|center| center.name),
        Resource::PaymentTypes => PaymentType::deserialize(row).ok().map(|payment| payment.name),
        Resource::Entries | Resource::RecurringEntries => None,
    };
    typed.unwrap_or_else(|| row.field_text("name").unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn expense_amounts_render_negative() {
        let row = json!({
            "id": 1,
            "amount": 250,
            "category": {"id": 2, "name": "Rent", "type": "expense"},
            "period": "2024-03"
        });
        let columns = resource_columns(Resource::Entries);

        assert_eq!(columns[0].cell(&row), Cell::plain("March 2024"));
        assert_eq!(columns[1].cell(&row), Cell::toned("-250.00", Tone::Negative));
        assert_eq!(columns[3].cell(&row), Cell::toned("Expense", Tone::Negative));
    }

    #[test]
    fn malformed_rows_fall_back_to_raw_text() {
        let row = json!({"id": 1, "amount": "abc", "period": "soon"});
        let columns = resource_columns(Resource::Entries);

        assert_eq!(columns[0].cell(&row).text, "soon");
        assert_eq!(columns[1].cell(&row).text, "abc");
        assert_eq!(columns[3].cell(&row).tone, Tone::Muted);
    }

    #[test]
    fn recurring_columns_render_typed_fields() {
        let row = json!({
            "id": 3,
            "amount": 99.9,
            "description": "Gym",
            "frequency": "monthly",
            "category": {"id": 4, "name": "Health", "type": "expense"},
            "next_run": "2024-05-10"
        });
        let columns = resource_columns(Resource::RecurringEntries);
        let texts: Vec<_> = columns.iter().map(|c| c.cell(&row).text).collect();

        assert_eq!(
            texts,
            vec!["Monthly", "-99.90", "Health", "Expense", "10/05/2024", "Gym"]
        );
    }

    #[test]
    fn every_resource_has_sortable_columns() {
        for resource in Resource::ALL {
            assert!(resource_columns(resource).iter().any(|c| c.sortable));
        }
    }

    #[test]
    fn category_options_show_type() {
        let row = json!({"id": 1, "name": "Salary", "type": "income"});

        assert_eq!(option_label(Resource::Categories, &row), "Salary (Income)");
        assert_eq!(option_label(Resource::PaymentTypes, &row), "Salary");

        let retired = json!({"id": 2, "name": "Old rent", "type": "expense", "active": false});
        assert_eq!(
            option_label(Resource::Categories, &retired),
            "Old rent (Expense), inactive"
        );
    }
}
