use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use dioxus::prelude::*;
use serde_json::Value;

use crate::domain::entities::debounce::Debouncer;
use crate::domain::entities::deletion::{DeletionState, DeletionWorkflow};
use crate::domain::entities::filter::{DatePart, FilterField, FilterState};
use crate::domain::entities::notification::Notification;
use crate::domain::entities::page::ListPage;
use crate::domain::entities::query_key::build_key;
use crate::domain::entities::record::{row_id_of, CategoryKind};
use crate::domain::entities::resource::Resource;
use crate::platform::desktop::blocking::run_blocking;
use crate::ui::columns::{build_resource_view, option_label};
use crate::ui::components::confirm_modal::ConfirmModal;
use crate::ui::components::data_grid::DataGrid;
use crate::ui::state::app_state::{panel_style, AppState, Services, SharedCache, View};
use crate::usecase::ports::data_source::ApiError;
use crate::usecase::services::edit_service::settle_deletion;
use crate::usecase::services::list_cache::ActiveQuery;
use crate::usecase::services::query_service::ListError;

/// Selection after clicking one checkbox of a multi-value filter.
pub fn toggled_values(current: Option<&BTreeSet<String>>, value: &str) -> Vec<String> {
    let mut next: BTreeSet<String> = current.cloned().unwrap_or_default();
    if !next.remove(value) {
        next.insert(value.to_string());
    }
    next.into_iter().collect()
}

pub fn parse_date_input(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

fn empty_page(state: &FilterState) -> ListPage<Value> {
    ListPage {
        page: state.page(),
        items_per_page: state.items_per_page(),
        ..ListPage::default()
    }
}

#[component]
pub fn ResourceList(resource: Resource) -> Element {
    let services = use_context::<Services>();
    let app = use_context::<AppState>();
    let cache = use_context::<SharedCache>();
    let items_per_page = services.config.items_per_page;
    let debounce_window = services.config.search_debounce();

    let mut filter_state = use_signal(move || {
        FilterState::new(items_per_page).with_sort(resource.default_sort())
    });
    let mut search_input = use_signal(String::new);
    let mut debouncer = use_signal(move || Debouncer::<String>::new(debounce_window));
    let mut active = use_signal(ActiveQuery::default);
    let mut shown = use_signal(|| None::<ListPage<Value>>);
    let mut load_error = use_signal(|| None::<String>);
    let mut loading = use_signal(|| false);
    let mut deletion = use_signal(DeletionWorkflow::new);
    let mut lookups = use_signal(BTreeMap::<Resource, Vec<Value>>::new);

    let services_for_fetch = services.clone();
    let cache_for_fetch = cache.clone();
    use_effect(move || {
        let state = filter_state();
        cache_for_fetch.watch();
        let key = build_key(resource, &state);
        active.write().point_to(key.clone());

        if let Some(page) = cache_for_fetch.get(&key) {
            if let Some(last) = page.clamp_page(state.page()) {
                filter_state.set(state.with_page(last));
                return;
            }
            shown.set(Some(page));
            load_error.set(None);
            loading.set(false);
            return;
        }

        loading.set(true);
        let Some(ticket) = cache_for_fetch.begin(&key) else {
            return;
        };
        tracing::debug!(%key, "cache miss");

        let query = services_for_fetch.query.clone();
        let services = services_for_fetch.clone();
        let cache = cache_for_fetch.clone();
        let requested = state.clone();
        spawn(async move {
            let result = run_blocking(move || query.fetch_page(resource, &requested)).await;
            let err = match result {
                Ok(Ok(page)) => {
                    cache.store(ticket, page);
                    return;
                }
                Ok(Err(err)) => err,
                Err(join_err) => ListError::fetch_task_failed(resource, state, join_err),
            };
            cache.fail(&ticket);
            if active.peek().is_current(ticket.key()) {
                tracing::warn!(error = %err, "list load failed");
                loading.set(false);
                load_error.set(Some(err.user_message()));
                app.report_api_error(&services, err.api_error(), err.user_message());
            }
        });
    });

    let services_for_lookups = services.clone();
    use_effect(move || {
        if resource.filter_fields().is_empty() {
            return;
        }
        for lookup in [Resource::Categories, Resource::PaymentTypes] {
            let query = services_for_lookups.query.clone();
            spawn(async move {
                match run_blocking(move || query.options(lookup)).await {
                    Ok(Ok(rows)) => {
                        lookups.write().insert(lookup, rows);
                    }
                    Ok(Err(err)) => tracing::warn!(error = %err, "filter options failed"),
                    Err(err) => tracing::warn!(error = %err, "filter options task failed"),
                }
            });
        }
    });

    let state_snapshot = filter_state();
    let page_snapshot = shown().unwrap_or_else(|| empty_page(&state_snapshot));
    let grid_view = build_resource_view(resource, &page_snapshot, state_snapshot.sort());
    let sort_snapshot = state_snapshot.sort().clone();
    let date_range = state_snapshot.date_range();
    let from_value = date_range.from.map(|d| d.to_string()).unwrap_or_default();
    let to_value = date_range.to.map(|d| d.to_string()).unwrap_or_default();
    let kind_value = state_snapshot
        .filter_values(FilterField::CategoryType)
        .and_then(|values| values.iter().next().cloned())
        .unwrap_or_default();
    let lookups_snapshot = lookups();
    let workflow_snapshot = deletion();
    let pending = workflow_snapshot
        .pending_target()
        .cloned()
        .or_else(|| match workflow_snapshot.state() {
            DeletionState::Deleting(id) => Some(id.clone()),
            _ => None,
        });
    let deleting = workflow_snapshot.is_deleting();
    let searching = debouncer.read().is_pending();
    let has_search = !search_input.read().is_empty() || !state_snapshot.search().is_empty();
    let color_mode = (app.color_mode)();
    let title = resource.title();
    let singular = resource.singular();

    let services_for_delete = services.clone();
    let cache_for_delete = cache.clone();

    rsx! {
        div { style: "display: flex; flex-direction: column; gap: 12px; flex: 1; min-height: 0;",
            div { style: "display: flex; align-items: center; justify-content: space-between; gap: 12px;",
                h2 { style: "margin: 0;", "{title}" }
                button {
                    style: "padding: 6px 12px; border-radius: 6px; border: none; background: #2563eb; color: #fff; cursor: pointer;",
                    onclick: move |_| app.navigate(View::Form { resource, id: None }),
                    "New {singular}"
                }
            }

            div { style: "{panel_style(color_mode)} display: flex; flex-wrap: wrap; gap: 12px; align-items: flex-end;",
                label { style: "display: flex; flex-direction: column; gap: 4px; min-width: 240px;",
                    span { "Search" }
                    input {
                        value: search_input(),
                        placeholder: "Search {title}",
                        oninput: move |event| {
                            let value = event.value();
                            search_input.set(value.clone());
                            let ticket = debouncer.write().arm(value);
                            let window = debouncer.peek().window();
                            spawn(async move {
                                tokio::time::sleep(window).await;
                                let fired = debouncer.write().fire(ticket);
                                if let Some(search) = fired {
                                    let next = filter_state.peek().clone().with_search(search);
                                    filter_state.set(next);
                                }
                            });
                        }
                    }
                }
                if searching {
                    span { style: "color: #6b7280; font-size: 12px;", "Searching..." }
                }
                if has_search {
                    button {
                        onclick: move |_| {
                            debouncer.write().cancel();
                            search_input.set(String::new());
                            let next = filter_state.peek().clone().with_search("");
                            filter_state.set(next);
                        },
                        "Clear"
                    }
                }

                if resource.filter_fields().contains(&FilterField::CategoryType) {
                    label { style: "display: flex; flex-direction: column; gap: 4px;",
                        span { "{FilterField::CategoryType.label()}" }
                        select {
                            value: "{kind_value}",
                            onchange: move |event| {
                                let value = event.value();
                                let next = filter_state
                                    .peek()
                                    .clone()
                                    .with_filter(FilterField::CategoryType, CategoryKind::parse(&value).map(|k| k.as_str()));
                                filter_state.set(next);
                            },
                            option { value: "", "All" }
                            option { value: "income", "{CategoryKind::Income.label()}" }
                            option { value: "expense", "{CategoryKind::Expense.label()}" }
                        }
                    }
                }

                if resource.supports_date_range() {
                    label { style: "display: flex; flex-direction: column; gap: 4px;",
                        span { "From" }
                        input {
                            r#type: "date",
                            value: "{from_value}",
                            onchange: move |event| {
                                let next = filter_state
                                    .peek()
                                    .clone()
                                    .with_date(DatePart::From, parse_date_input(&event.value()));
                                filter_state.set(next);
                            }
                        }
                    }
                    label { style: "display: flex; flex-direction: column; gap: 4px;",
                        span { "To" }
                        input {
                            r#type: "date",
                            value: "{to_value}",
                            onchange: move |event| {
                                let next = filter_state
                                    .peek()
                                    .clone()
                                    .with_date(DatePart::To, parse_date_input(&event.value()));
                                filter_state.set(next);
                            }
                        }
                    }
                    if date_range.is_inverted() {
                        span { style: "color: #d97706;", "\"From\" is after \"To\"; no entries will match." }
                    }
                }
            }

            {[(FilterField::CategoryId, Resource::Categories), (FilterField::PaymentTypeId, Resource::PaymentTypes)]
                .into_iter()
                .filter(|(field, _)| resource.filter_fields().contains(field))
                .map(|(field, lookup)| {
                    let options = lookups_snapshot.get(&lookup).cloned().unwrap_or_default();
                    let selected = state_snapshot.filter_values(field).cloned().unwrap_or_default();
                    rsx!(
                        div { key: "{field.param_name()}", style: "display: flex; flex-wrap: wrap; gap: 8px; align-items: center;",
                            span { style: "font-weight: 600;", "{field.label()}:" }
                            {options.iter().filter_map(|row| {
                                let id = row_id_of(row)?.0;
                                let label = option_label(lookup, row);
                                let checked = selected.contains(&id);
                                let toggle_id = id.clone();
                                Some(rsx!(
                                    label { key: "{id}", style: "display: inline-flex; gap: 4px; align-items: center;",
                                        input {
                                            r#type: "checkbox",
                                            checked: checked,
                                            onclick: move |_| {
                                                let current = filter_state.peek().clone();
                                                let values = toggled_values(current.filter_values(field), &toggle_id);
                                                filter_state.set(current.with_filter(field, values));
                                            }
                                        }
                                        "{label}"
                                    }
                                ))
                            })}
                        }
                    )
                })}

            if let Some(message) = load_error() {
                div { style: "color: #dc2626;", "{message}" }
            }

            DataGrid {
                view: grid_view,
                sort: sort_snapshot,
                loading: loading(),
                on_sort_change: move |next| {
                    let state = filter_state.peek().clone().with_sort(next);
                    filter_state.set(state);
                },
                on_page_change: move |page| {
                    let state = filter_state.peek().clone().with_page(page);
                    filter_state.set(state);
                },
                on_view: move |id| app.navigate(View::Form { resource, id: Some(id) }),
                on_delete: move |id| {
                    if let Err(err) = deletion.write().request_delete(id) {
                        app.notify(Notification::error(err.to_string()));
                    }
                },
            }

            if let Some(target) = pending {
                ConfirmModal {
                    title: "Delete {singular}",
                    message: "Delete {singular} {target}? This cannot be undone.",
                    busy: deleting,
                    on_cancel: move |_| {
                        if let Err(err) = deletion.write().cancel() {
                            tracing::debug!(error = %err, "cancel ignored");
                        }
                    },
                    on_confirm: move |_| {
                        let id = match deletion.write().confirm() {
                            Ok(id) => id,
                            Err(_) => return,
                        };
                        let edit = services_for_delete.edit.clone();
                        let services = services_for_delete.clone();
                        let cache = cache_for_delete.clone();
                        spawn(async move {
                            let delete_id = id.clone();
                            let result = match run_blocking(move || edit.delete(resource, &delete_id)).await {
                                Ok(result) => result,
                                Err(join_err) => Err(ListError::Record {
                                    resource,
                                    action: "delete",
                                    id: Some(id),
                                    source: ApiError::Transport(join_err.to_string()),
                                }),
                            };
                            let api_err = result.as_ref().err().map(|err| err.api_error().clone());
                            let settled = {
                                let mut workflow = deletion.write();
                                cache.update(|list_cache| {
                                    settle_deletion(&mut workflow, list_cache, resource, result)
                                })
                            };
                            match (settled, api_err) {
                                (Ok(notice), Some(api_err)) => {
                                    app.report_api_error(&services, &api_err, notice.message);
                                }
                                (Ok(notice), None) => app.notify(notice),
                                (Err(err), _) => app.notify(Notification::error(err.to_string())),
                            }
                        });
                    },
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggling_adds_then_removes() {
        let added = toggled_values(None, "3");
        assert_eq!(added, vec!["3".to_string()]);

        let set: BTreeSet<String> = ["1", "3"].into_iter().map(String::from).collect();
        assert_eq!(toggled_values(Some(&set), "3"), vec!["1".to_string()]);
    }

    #[test]
    fn date_inputs_parse_iso_dates() {
        assert_eq!(
            parse_date_input("2024-02-29"),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
        assert_eq!(parse_date_input(""), None);
    }
}
