use std::collections::BTreeMap;

use dioxus::prelude::*;
use serde_json::Value;

use crate::domain::entities::draft::{form_fields, validate_draft, Draft, FieldKind, ValidationError};
use crate::domain::entities::record::{row_id_of, CategoryKind, Frequency, RowId};
use crate::domain::entities::resource::Resource;
use crate::platform::desktop::blocking::run_blocking;
use crate::ui::columns::option_label;
use crate::ui::state::app_state::{panel_style, AppState, Services, SharedCache, View};
use crate::usecase::ports::data_source::ApiError;
use crate::usecase::services::edit_service::settle_save;
use crate::usecase::services::query_service::ListError;

pub fn input_type(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Month => "month",
        FieldKind::Date => "date",
        FieldKind::Flag => "checkbox",
        _ => "text",
    }
}

pub fn error_for(errors: &[ValidationError], field: &str) -> Option<String> {
    errors
        .iter()
        .find(|err| err.field == field)
        .map(ToString::to_string)
}

/// Resources a form needs option lists for, without duplicates.
pub fn referenced_resources(resource: Resource) -> Vec<Resource> {
    let mut out = Vec::new();
    for spec in form_fields(resource) {
        if let FieldKind::Reference(target) = spec.kind {
            if !out.contains(&target) {
                out.push(target);
            }
        }
    }
    out
}

fn choice_list(kind: FieldKind) -> Vec<(&'static str, &'static str)> {
    match kind {
        FieldKind::Kind => [CategoryKind::Income, CategoryKind::Expense]
            .into_iter()
            .map(|k| (k.as_str(), k.label()))
            .collect(),
        FieldKind::Frequency => Frequency::ALL
            .into_iter()
            .map(|f| (f.as_str(), f.label()))
            .collect(),
        _ => Vec::new(),
    }
}

const FIELD_STYLE: &str = "display: flex; flex-direction: column; gap: 4px;";
const INPUT_STYLE: &str = "padding: 6px 8px; border-radius: 6px; border: 1px solid #9ca3af;";

#[component]
pub fn ResourceForm(resource: Resource, id: Option<RowId>) -> Element {
    let services = use_context::<Services>();
    let app = use_context::<AppState>();
    let cache = use_context::<SharedCache>();

    let today = chrono::Local::now().date_naive();
    let mut draft = use_signal(move || Draft::blank(resource, today));
    let mut errors = use_signal(Vec::<ValidationError>::new);
    let mut lookups = use_signal(BTreeMap::<Resource, Vec<Value>>::new);
    let mut loading_record = use_signal(|| id.is_some());
    let mut saving = use_signal(|| false);

    let services_for_load = services.clone();
    let load_id = id.clone();
    use_effect(move || {
        for target in referenced_resources(resource) {
            let query = services_for_load.query.clone();
            spawn(async move {
                match run_blocking(move || query.options(target)).await {
                    Ok(Ok(rows)) => {
                        lookups.write().insert(target, rows);
                    }
                    Ok(Err(err)) => tracing::warn!(error = %err, "form options failed"),
                    Err(err) => tracing::warn!(error = %err, "form options task failed"),
                }
            });
        }

        let Some(record_id) = load_id.clone() else {
            return;
        };
        let query = services_for_load.query.clone();
        let services = services_for_load.clone();
        spawn(async move {
            let fetch_id = record_id.clone();
            let result = match run_blocking(move || query.fetch_one(resource, &fetch_id)).await {
                Ok(result) => result,
                Err(join_err) => Err(ListError::Record {
                    resource,
                    action: "load",
                    id: Some(record_id),
                    source: ApiError::Transport(join_err.to_string()),
                }),
            };
            loading_record.set(false);
            match result {
                Ok(record) => draft.set(Draft::from_record(resource, &record)),
                Err(err) => app.report_api_error(&services, err.api_error(), err.user_message()),
            }
        });
    });

    let submit_id = id.clone();
    let services_for_submit = services.clone();
    let submit = move |_| {
        let current = draft.peek().clone();
        let payload = match validate_draft(resource, &current, today) {
            Ok(payload) => payload,
            Err(issues) => {
                errors.set(issues);
                return;
            }
        };
        errors.set(Vec::new());
        saving.set(true);

        let edit = services_for_submit.edit.clone();
        let services = services_for_submit.clone();
        let cache = cache.clone();
        let target = submit_id.clone();
        spawn(async move {
            let save_id = target.clone();
            let result =
                match run_blocking(move || edit.save(resource, save_id.as_ref(), payload)).await {
                    Ok(result) => result,
                    Err(join_err) => Err(ListError::Record {
                        resource,
                        action: if target.is_some() { "update" } else { "create" },
                        id: target.clone(),
                        source: ApiError::Transport(join_err.to_string()),
                    }),
                };
            saving.set(false);
            let notice = cache.update(|list_cache| {
                settle_save(list_cache, resource, target.is_none(), &result)
            });
            match result {
                Ok(_) => {
                    app.notify(notice);
                    app.navigate(View::List(resource));
                }
                Err(err) => app.report_api_error(&services, err.api_error(), notice.message),
            }
        });
    };

    let singular = resource.singular();
    let heading = match &id {
        Some(id) => format!("Edit {singular} #{id}"),
        None => format!("New {singular}"),
    };
    let color_mode = (app.color_mode)();
    let current = draft();
    let current_errors = errors();
    let lookups_snapshot = lookups();
    let is_saving = saving();

    rsx! {
        div { style: "{panel_style(color_mode)} display: flex; flex-direction: column; gap: 12px; max-width: 560px;",
            h2 { style: "margin: 0;", "{heading}" }
            if loading_record() {
                div { style: "color: #6b7280;", "Loading..." }
            }

            {form_fields(resource).iter().filter(|spec| current.is_shown(spec)).map(|spec| {
                let name = spec.name;
                let kind = spec.kind;
                let value = current.get(name).to_string();
                let error = error_for(&current_errors, name);
                let required_mark = if spec.required { " *" } else { "" };
                let label = spec.label;
                let control = match kind {
                    FieldKind::Kind | FieldKind::Frequency => {
                        let choices = choice_list(kind);
                        rsx!(
                            select {
                                style: INPUT_STYLE,
                                onchange: move |event| draft.write().set(name, event.value()),
                                {choices.into_iter().map(|(raw, text)| {
                                    let selected = value == raw;
                                    rsx!(option { key: "{raw}", value: "{raw}", selected: selected, "{text}" })
                                })}
                            }
                        )
                    }
                    FieldKind::Reference(target) => {
                        let rows = lookups_snapshot.get(&target).cloned().unwrap_or_default();
                        rsx!(
                            select {
                                style: INPUT_STYLE,
                                onchange: move |event| draft.write().set(name, event.value()),
                                option { value: "", selected: value.is_empty(), "Select..." }
                                {rows.iter().filter_map(|row| {
                                    let row_id = row_id_of(row)?.0;
                                    let text = option_label(target, row);
                                    let selected = value == row_id;
                                    Some(rsx!(option { key: "{row_id}", value: "{row_id}", selected: selected, "{text}" }))
                                })}
                            }
                        )
                    }
                    FieldKind::Flag => {
                        let checked = value == "true";
                        rsx!(
                            input {
                                r#type: "checkbox",
                                checked: checked,
                                onclick: move |_| {
                                    let next = if draft.peek().get(name) == "true" { "false" } else { "true" };
                                    draft.write().set(name, next);
                                }
                            }
                        )
                    }
                    _ => rsx!(
                        input {
                            style: INPUT_STYLE,
                            r#type: input_type(kind),
                            value: "{value}",
                            oninput: move |event| draft.write().set(name, event.value()),
                        }
                    ),
                };
                rsx!(
                    label { key: "{name}", style: FIELD_STYLE,
                        span { "{label}{required_mark}" }
                        {control}
                        if let Some(message) = error {
                            span { style: "color: #dc2626; font-size: 12px;", "{message}" }
                        }
                    }
                )
            })}

            div { style: "display: flex; gap: 8px; justify-content: flex-end;",
                button {
                    disabled: is_saving,
                    onclick: move |_| app.navigate(View::List(resource)),
                    "Cancel"
                }
                button {
                    style: "padding: 6px 12px; border-radius: 6px; border: none; background: #2563eb; color: #fff; cursor: pointer;",
                    disabled: is_saving,
                    onclick: submit,
                    if is_saving { "Saving..." } else { "Save" }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::draft::FieldIssue;

    #[test]
    fn entry_form_needs_categories_and_payment_types() {
        assert_eq!(
            referenced_resources(Resource::Entries),
            vec![Resource::Categories, Resource::PaymentTypes]
        );
        assert!(referenced_resources(Resource::CostCenters).is_empty());
    }

    #[test]
    fn errors_are_matched_by_field_name() {
        let errors = vec![ValidationError {
            field: "amount",
            label: "Amount",
            issue: FieldIssue::NotPositive,
        }];
        assert_eq!(
            error_for(&errors, "amount").as_deref(),
            Some("Amount must be greater than 0")
        );
        assert_eq!(error_for(&errors, "period"), None);
    }

    #[test]
    fn month_and_date_fields_use_native_pickers() {
        assert_eq!(input_type(FieldKind::Month), "month");
        assert_eq!(input_type(FieldKind::Date), "date");
        assert_eq!(input_type(FieldKind::Amount), "text");
        assert_eq!(choice_list(FieldKind::Frequency).len(), 4);
    }
}
