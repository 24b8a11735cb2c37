use dioxus::prelude::*;

use crate::domain::entities::record::RowId;
use crate::domain::entities::sort::SortState;
use crate::ui::grid::{
    header_cell_style, header_click, indicator_glyph, page_button_style, table_container_style,
    tone_color, GridView,
};

/// Renders a prepared `GridView`. Emits sort, page and row-action events and
/// never fetches on its own.
#[component]
pub fn DataGrid(
    view: GridView,
    sort: SortState,
    loading: bool,
    on_sort_change: EventHandler<SortState>,
    on_page_change: EventHandler<u32>,
    on_view: EventHandler<RowId>,
    on_delete: EventHandler<RowId>,
) -> Element {
    let column_count = view.headers.len() + 1;
    let pagination = view.pagination.clone();
    let current_page = pagination.page;
    let shown_page_count = pagination.page_count.max(1);
    let opacity = if loading { "0.6" } else { "1" };

    rsx! {
        div { style: "display: flex; flex-direction: column; gap: 8px; min-height: 0; flex: 1;",
            div { style: "{table_container_style()} opacity: {opacity};",
                table { style: "border-collapse: collapse; width: 100%;",
                    thead {
                        tr {
                            {view.headers.iter().map(|header| {
                                let header = header.clone();
                                let sort = sort.clone();
                                let label = header.label.clone();
                                let glyph = indicator_glyph(header.indicator);
                                let align = header.align.as_css();
                                let width = header.width.unwrap_or("auto");
                                let sortable = header.sortable;
                                rsx!(
                                    th {
                                        style: "{header_cell_style(sortable)} text-align: {align}; width: {width};",
                                        onclick: move |_| {
                                            if let Some(next) = header_click(&header, &sort) {
                                                on_sort_change.call(next);
                                            }
                                        },
                                        "{label}"
                                        if sortable {
                                            span { style: "margin-left: 6px; font-size: 11px;", "{glyph}" }
                                        }
                                    }
                                )
                            })}
                            th { style: "{header_cell_style(false)} width: 140px;", "Actions" }
                        }
                    }
                    tbody {
                        if view.rows.is_empty() {
                            tr {
                                td {
                                    colspan: "{column_count}",
                                    style: "padding: 16px; text-align: center; color: #6b7280;",
                                    if loading { "Loading..." } else { "No records found" }
                                }
                            }
                        }
                        {view.rows.iter().enumerate().map(|(row_idx, row)| {
                            let cells = row.cells.clone();
                            let aligns: Vec<&'static str> =
                                view.headers.iter().map(|h| h.align.as_css()).collect();
                            let view_id = row.id.clone();
                            let delete_id = row.id.clone();
                            let has_id = row.id.is_some();
                            rsx!(
                                tr { key: "{row_idx}",
                                    {cells.into_iter().enumerate().map(|(idx, cell)| {
                                        let align = aligns.get(idx).copied().unwrap_or("left");
                                        let color = tone_color(cell.tone);
                                        rsx!(
                                            td {
                                                style: "border: 1px solid #d0d5dd; padding: 6px 8px; text-align: {align}; color: {color};",
                                                "{cell.text}"
                                            }
                                        )
                                    })}
                                    td { style: "border: 1px solid #d0d5dd; padding: 4px 8px; white-space: nowrap;",
                                        button {
                                            style: "margin-right: 6px; cursor: pointer;",
                                            disabled: !has_id,
                                            onclick: move |_| {
                                                if let Some(id) = view_id.clone() {
                                                    on_view.call(id);
                                                }
                                            },
                                            "View"
                                        }
                                        button {
                                            style: "color: #dc2626; cursor: pointer;",
                                            disabled: !has_id,
                                            onclick: move |_| {
                                                if let Some(id) = delete_id.clone() {
                                                    on_delete.call(id);
                                                }
                                            },
                                            "Delete"
                                        }
                                    }
                                }
                            )
                        })}
                    }
                }
            }

            div { style: "display: flex; align-items: center; justify-content: space-between; gap: 12px; flex-wrap: wrap;",
                span { "Page {current_page} of {shown_page_count}" }
                div { style: "display: flex; gap: 4px; flex-wrap: wrap;",
                    button {
                        style: "{page_button_style(false)}",
                        disabled: !pagination.has_previous,
                        onclick: move |_| on_page_change.call(current_page.saturating_sub(1).max(1)),
                        "Previous"
                    }
                    {pagination.buttons().map(|number| {
                        let active = number == current_page;
                        rsx!(
                            button {
                                key: "{number}",
                                style: "{page_button_style(active)}",
                                onclick: move |_| {
                                    if !active {
                                        on_page_change.call(number);
                                    }
                                },
                                "{number}"
                            }
                        )
                    })}
                    button {
                        style: "{page_button_style(false)}",
                        disabled: !pagination.has_next,
                        onclick: move |_| on_page_change.call(current_page + 1),
                        "Next"
                    }
                }
            }

            if let Some(total) = view.total_amount.clone() {
                div { style: "display: flex; justify-content: flex-end; font-size: 18px; font-weight: 600; color: {tone_color(total.tone)};",
                    "Total: {total.text}"
                }
            }
        }
    }
}
