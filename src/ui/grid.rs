use serde_json::Value;

use crate::domain::entities::page::{has_previous_page, ListPage};
use crate::domain::entities::record::{lookup_path, row_id_of, value_text, RowId};
use crate::domain::entities::sort::{apply_sort_click, SortIndicator, SortState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Positive,
    Negative,
    Muted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

impl Align {
    pub fn as_css(self) -> &'static str {
        match self {
            Align::Left => "left",
            Align::Right => "right",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    pub tone: Tone,
}

impl Cell {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: Tone::Plain,
        }
    }

    pub fn toned(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }
}

/// What the grid needs from a row without knowing its type.
pub trait GridRow {
    fn row_id(&self) -> Option<RowId>;
    fn field_text(&self, path: &str) -> Option<String>;
}

impl GridRow for Value {
    fn row_id(&self) -> Option<RowId> {
        row_id_of(self)
    }

    fn field_text(&self, path: &str) -> Option<String> {
        lookup_path(self, path).map(value_text)
    }
}

pub struct ColumnSpec<R> {
    /// Sort key sent to the server and fallback lookup path.
    pub key: &'static str,
    pub header: &'static str,
    pub sortable: bool,
    pub align: Align,
    pub width: Option<&'static str>,
    pub render: Option<fn(&R) -> Cell>,
}

impl<R> ColumnSpec<R> {
    pub fn new(key: &'static str, header: &'static str) -> Self {
        Self {
            key,
            header,
            sortable: false,
            align: Align::Left,
            width: None,
            render: None,
        }
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn width(mut self, width: &'static str) -> Self {
        self.width = Some(width);
        self
    }

    pub fn render(mut self, render: fn(&R) -> Cell) -> Self {
        self.render = Some(render);
        self
    }
}

impl<R: GridRow> ColumnSpec<R> {
    pub fn cell(&self, row: &R) -> Cell {
        match self.render {
            Some(render) => render(row),
            None => Cell::plain(row.field_text(self.key).unwrap_or_default()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderView {
    pub key: String,
    pub label: String,
    pub sortable: bool,
    pub indicator: SortIndicator,
    pub align: Align,
    pub width: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub id: Option<RowId>,
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationView {
    pub page: u32,
    pub page_count: u32,
    pub has_previous: bool,
    pub has_next: bool,
}

impl PaginationView {
    pub fn buttons(&self) -> impl Iterator<Item = u32> {
        1..=self.page_count
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridView {
    pub headers: Vec<HeaderView>,
    pub rows: Vec<RowView>,
    pub pagination: PaginationView,
    pub total_amount: Option<Cell>,
}

/// Pure projection of one page into what the grid shows. Reads only its
/// inputs, so the same page and sort always render the same.
pub fn build_grid_view<R: GridRow>(
    columns: &[ColumnSpec<R>],
    page: &ListPage<R>,
    sort: &SortState,
) -> GridView {
    let headers = columns
        .iter()
        .map(|column| HeaderView {
            key: column.key.to_string(),
            label: column.header.to_string(),
            sortable: column.sortable,
            indicator: if column.sortable {
                sort.indicator_for(column.key)
            } else {
                SortIndicator::Neutral
            },
            align: column.align,
            width: column.width,
        })
        .collect();

    let rows = page
        .rows
        .iter()
        .map(|row| RowView {
            id: row.row_id(),
            cells: columns.iter().map(|column| column.cell(row)).collect(),
        })
        .collect();

    GridView {
        headers,
        rows,
        pagination: PaginationView {
            page: page.page,
            page_count: page.page_count(),
            has_previous: has_previous_page(page.page),
            has_next: page.has_next(),
        },
        total_amount: page.total_amount.map(money_cell),
    }
}

/// Sort after clicking `header`; `None` for columns that do not sort.
pub fn header_click(header: &HeaderView, sort: &SortState) -> Option<SortState> {
    header
        .sortable
        .then(|| apply_sort_click(sort, &header.key))
}

pub fn format_money(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (idx, ch) in whole.chars().enumerate() {
        if idx > 0 && (whole.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}{grouped}.{:02}", cents % 100)
}

pub fn money_cell(value: f64) -> Cell {
    let tone = if value < 0.0 {
        Tone::Negative
    } else {
        Tone::Positive
    };
    Cell::toned(format_money(value), tone)
}

pub fn indicator_glyph(indicator: SortIndicator) -> &'static str {
    match indicator {
        SortIndicator::Neutral => "↕",
        SortIndicator::Ascending => "▲",
        SortIndicator::Descending => "▼",
    }
}

pub fn tone_color(tone: Tone) -> &'static str {
    match tone {
        Tone::Plain => "inherit",
        Tone::Positive => "#16a34a",
        Tone::Negative => "#dc2626",
        Tone::Muted => "#6b7280",
    }
}

pub fn table_container_style() -> &'static str {
    "flex: 1; min-height: 0; overflow: auto; border: 1px solid #d0d5dd; border-radius: 8px;"
}

pub fn header_cell_style(sortable: bool) -> &'static str {
    if sortable {
        "position: sticky; top: 0; background: #f2f4f7; border: 1px solid #d0d5dd; padding: 6px 8px; cursor: pointer; user-select: none;"
    } else {
        "position: sticky; top: 0; background: #f2f4f7; border: 1px solid #d0d5dd; padding: 6px 8px;"
    }
}

pub fn page_button_style(active: bool) -> &'static str {
    if active {
        "min-width: 32px; padding: 4px 8px; border: 1px solid #2563eb; background: #2563eb; color: #fff; border-radius: 6px;"
    } else {
        "min-width: 32px; padding: 4px 8px; border: 1px solid #d0d5dd; background: transparent; color: inherit; border-radius: 6px; cursor: pointer;"
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::entities::sort::SortDirection;

    fn columns() -> Vec<ColumnSpec<Value>> {
        vec![
            ColumnSpec::new("name", "Name").sortable(),
            ColumnSpec::new("category.type", "Type").sortable(),
            ColumnSpec::new("description", "Description"),
        ]
    }

    fn page(rows: Vec<Value>, total: Option<u64>, page: u32) -> ListPage<Value> {
        ListPage {
            rows,
            total,
            total_amount: None,
            page,
            items_per_page: 10,
        }
    }

    #[test]
    fn indicators_follow_sort_state_only() {
        let sort = SortState::by("category.type", SortDirection::Desc);
        let view = build_grid_view(&columns(), &page(Vec::new(), Some(0), 1), &sort);

        let indicators: Vec<_> = view.headers.iter().map(|h| h.indicator).collect();
        assert_eq!(
            indicators,
            vec![
                SortIndicator::Neutral,
                SortIndicator::Descending,
                SortIndicator::Neutral
            ]
        );
    }

    #[test]
    fn cells_fall_back_to_dotted_lookup() {
        let rows = vec![json!({"id": 5, "name": "Rent", "category": {"type": "expense"}})];
        let view = build_grid_view(&columns(), &page(rows, Some(1), 1), &SortState::new());

        assert_eq!(view.rows[0].id, Some(RowId::from("5")));
        let texts: Vec<_> = view.rows[0].cells.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["Rent", "expense", ""]);
    }

    #[test]
    fn renderer_overrides_lookup() {
        fn shout(row: &Value) -> Cell {
            Cell::plain(row.field_text("name").unwrap_or_default().to_uppercase())
        }
        let columns = vec![ColumnSpec::new("name", "Name").render(shout)];
        let view = build_grid_view(
            &columns,
            &page(vec![json!({"name": "rent"})], None, 1),
            &SortState::new(),
        );

        assert_eq!(view.rows[0].cells[0].text, "RENT");
        assert_eq!(view.rows[0].id, None);
    }

    #[test]
    fn pagination_counts_buttons() {
        let view = build_grid_view(&columns(), &page(Vec::new(), Some(95), 1), &SortState::new());
        assert_eq!(view.pagination.buttons().count(), 10);
        assert!(!view.pagination.has_previous);
        assert!(view.pagination.has_next);

        let empty = build_grid_view(&columns(), &page(Vec::new(), Some(0), 1), &SortState::new());
        assert_eq!(empty.pagination.buttons().count(), 0);
        assert!(!empty.pagination.has_next);
    }

    #[test]
    fn non_sortable_header_click_is_ignored() {
        let view = build_grid_view(&columns(), &page(Vec::new(), Some(0), 1), &SortState::new());

        assert_eq!(header_click(&view.headers[2], &SortState::new()), None);
        assert_eq!(
            header_click(&view.headers[0], &SortState::new()),
            Some(SortState::by("name", SortDirection::Asc))
        );
    }

    #[test]
    fn money_is_grouped_and_toned() {
        assert_eq!(format_money(1234567.891), "1,234,567.89");
        assert_eq!(format_money(-42.5), "-42.50");
        assert_eq!(format_money(-0.001), "0.00");
        assert_eq!(money_cell(-3.0).tone, Tone::Negative);
        assert_eq!(money_cell(0.0).tone, Tone::Positive);
    }

    #[test]
    fn total_amount_footer_only_when_present() {
        let mut with_total = page(Vec::new(), Some(0), 1);
        with_total.total_amount = Some(-120.0);

        let view = build_grid_view(&columns(), &with_total, &SortState::new());
        assert_eq!(view.total_amount, Some(Cell::toned("-120.00", Tone::Negative)));

        let view = build_grid_view(&columns(), &page(Vec::new(), Some(0), 1), &SortState::new());
        assert_eq!(view.total_amount, None);
    }

    #[test]
    fn sticky_headers_and_scrolling_container() {
        assert!(header_cell_style(true).contains("cursor: pointer"));
        assert!(!header_cell_style(false).contains("cursor"));
        assert!(table_container_style().contains("overflow: auto"));
    }
}
