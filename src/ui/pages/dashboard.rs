use chrono::Datelike;
use dioxus::prelude::*;

use crate::domain::entities::record::{MonthlyTotals, MonthlySummary};
use crate::platform::desktop::blocking::run_blocking;
use crate::ui::columns::month_label;
use crate::ui::grid::{money_cell, table_container_style, tone_color, Cell};
use crate::ui::state::app_state::{panel_style, AppState, Services};
use crate::usecase::ports::data_source::ApiError;
use crate::usecase::services::dashboard_service::YearOverview;

/// Row cells for one month of the yearly summary: label, income, expense, balance.
pub fn summary_cells(summary: &MonthlySummary) -> [Cell; 4] {
    let label = month_label(&summary.month).unwrap_or_else(|| summary.month.clone());
    [
        Cell::plain(label),
        money_cell(summary.income),
        money_cell(-summary.expense),
        money_cell(summary.balance()),
    ]
}

fn month_name(month: u32) -> String {
    chrono::NaiveDate::from_ymd_opt(2000, month, 1)
        .map(|date| date.format("%B").to_string())
        .unwrap_or_else(|| month.to_string())
}

const CELL_STYLE: &str = "border: 1px solid #d0d5dd; padding: 6px 8px;";

#[component]
pub fn Dashboard() -> Element {
    let services = use_context::<Services>();
    let app = use_context::<AppState>();

    let today = chrono::Local::now().date_naive();
    let mut year = use_signal(move || today.year());
    let mut month = use_signal(move || today.month());
    let mut overview = use_signal(|| None::<YearOverview>);
    let mut totals = use_signal(|| None::<MonthlyTotals>);
    let mut load_error = use_signal(|| None::<String>);

    let services_for_year = services.clone();
    use_effect(move || {
        let requested = year();
        let dashboard = services_for_year.dashboard.clone();
        let services = services_for_year.clone();
        spawn(async move {
            let result = run_blocking(move || dashboard.year_overview(requested))
                .await
                .unwrap_or_else(|err| Err(ApiError::Transport(err.to_string())));
            if *year.peek() != requested {
                return;
            }
            match result {
                Ok(data) => {
                    load_error.set(None);
                    overview.set(Some(data));
                }
                Err(err) => {
                    load_error.set(Some(err.user_message()));
                    app.report_api_error(&services, &err, err.user_message());
                }
            }
        });
    });

    let services_for_month = services.clone();
    use_effect(move || {
        let requested = (year(), month());
        let dashboard = services_for_month.dashboard.clone();
        spawn(async move {
            let result = run_blocking(move || dashboard.month_totals(requested.0, requested.1))
                .await
                .unwrap_or_else(|err| Err(ApiError::Transport(err.to_string())));
            if (*year.peek(), *month.peek()) != requested {
                return;
            }
            match result {
                Ok(data) => totals.set(Some(data)),
                Err(err) => {
                    tracing::warn!(error = %err, "monthly totals unavailable");
                    totals.set(None);
                }
            }
        });
    });

    let color_mode = (app.color_mode)();
    let shown_year = year();
    let shown_month = month();
    let overview_snapshot = overview();
    let totals_snapshot = totals();

    rsx! {
        div { style: "display: flex; flex-direction: column; gap: 16px;",
            div { style: "display: flex; align-items: center; gap: 8px;",
                button { onclick: move |_| year -= 1, "◀" }
                h2 { style: "margin: 0;", "{shown_year}" }
                button { onclick: move |_| year += 1, "▶" }
            }

            if let Some(message) = load_error() {
                div { style: "color: #dc2626;", "{message}" }
            }

            div { style: "{panel_style(color_mode)}",
                h3 { style: "margin-top: 0;", "Monthly summary" }
                div { style: "{table_container_style()}",
                    table { style: "border-collapse: collapse; width: 100%;",
                        thead {
                            tr {
                                th { style: CELL_STYLE, "Month" }
                                th { style: CELL_STYLE, "Income" }
                                th { style: CELL_STYLE, "Expense" }
                                th { style: CELL_STYLE, "Balance" }
                            }
                        }
                        tbody {
                            {overview_snapshot.iter().flat_map(|data| data.months.iter()).map(|summary| {
                                let cells = summary_cells(summary);
                                rsx!(
                                    tr { key: "{summary.month}",
                                        {cells.into_iter().enumerate().map(|(idx, cell)| {
                                            let align = if idx == 0 { "left" } else { "right" };
                                            rsx!(
                                                td { key: "{idx}", style: "{CELL_STYLE} text-align: {align}; color: {tone_color(cell.tone)};",
                                                    "{cell.text}"
                                                }
                                            )
                                        })}
                                    }
                                )
                            })}
                        }
                    }
                }
                if let Some(data) = overview_snapshot.clone() {
                    {
                        let balance = money_cell(data.balance);
                        rsx!(
                            div { style: "text-align: right; margin-top: 8px; font-weight: 600; color: {tone_color(balance.tone)};",
                                "Balance {data.year}: {balance.text}"
                            }
                        )
                    }
                }
            }

            div { style: "{panel_style(color_mode)}",
                div { style: "display: flex; align-items: center; gap: 8px; margin-bottom: 8px;",
                    h3 { style: "margin: 0;", "Totals by category" }
                    select {
                        onchange: move |event| {
                            if let Ok(value) = event.value().parse::<u32>() {
                                month.set(value);
                            }
                        },
                        {(1..=12u32).map(|m| {
                            let selected = m == shown_month;
                            rsx!(option { key: "{m}", value: "{m}", selected: selected, "{month_name(m)}" })
                        })}
                    }
                }
                {match totals_snapshot {
                    Some(data) if !data.totals.is_empty() => {
                        let balance = money_cell(data.balance());
                        rsx!(
                            ul { style: "margin: 0; padding-left: 18px;",
                                {data.totals.iter().map(|total| {
                                    let amount = money_cell(total.kind.signed(total.total));
                                    rsx!(
                                        li { key: "{total.category_id}",
                                            "{total.category_name}: "
                                            span { style: "color: {tone_color(amount.tone)};", "{amount.text}" }
                                        }
                                    )
                                })}
                            }
                            div { style: "text-align: right; font-weight: 600; color: {tone_color(balance.tone)};",
                                "Month balance: {balance.text}"
                            }
                        )
                    }
                    _ => rsx!(div { style: "color: #6b7280;", "No entries for this month" }),
                }}
            }
        }
    }
}
