use std::fmt;

use serde_json::{json, Map, Value};

use crate::domain::entities::filter::FilterState;
use crate::domain::entities::resource::Resource;

/// Cache and request identity of one list fetch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey {
    resource: Resource,
    params: String,
}

impl QueryKey {
    pub fn resource(&self) -> Resource {
        self.resource
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.resource, self.params)
    }
}

/// Serializes every request-affecting field of `state`. JSON objects keep
/// keys sorted and filter values are sets, so equal states give equal keys.
pub fn build_key(resource: Resource, state: &FilterState) -> QueryKey {
    let sort_by: Vec<&str> = state.sort().columns().iter().map(String::as_str).collect();
    let sort_order: Vec<&str> = state
        .sort()
        .directions()
        .iter()
        .map(|d| d.as_str())
        .collect();

    let mut filters = Map::new();
    for (field, values) in state.filters() {
        let values: Vec<&str> = values.iter().map(String::as_str).collect();
        filters.insert(field.param_name().to_string(), json!(values));
    }

    let range = state.date_range();
    let params = json!({
        "search": state.search(),
        "page": state.page(),
        "items_per_page": state.items_per_page(),
        "sort_by": sort_by,
        "sort_order": sort_order,
        "filters": Value::Object(filters),
        "from": range.from.map(|d| d.to_string()),
        "to": range.to.map(|d| d.to_string()),
    });

    QueryKey {
        resource,
        params: params.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::entities::filter::{DatePart, FilterField};
    use crate::domain::entities::sort::{SortDirection, SortState};

    fn base() -> FilterState {
        FilterState::default()
            .with_search("rent")
            .with_sort(SortState::by("period", SortDirection::Desc))
    }

    #[test]
    fn equal_states_build_equal_keys() {
        let a = base().with_filter(FilterField::CategoryId, ["3", "1", "2"]);
        let b = base().with_filter(FilterField::CategoryId, ["2", "3", "1"]);

        assert_eq!(
            build_key(Resource::Entries, &a),
            build_key(Resource::Entries, &b)
        );
    }

    #[test]
    fn every_request_field_changes_the_key() {
        let reference = build_key(Resource::Entries, &base());
        let variants = vec![
            base().with_search("food"),
            base().with_page(2),
            FilterState::new(20)
                .with_search("rent")
                .with_sort(SortState::by("period", SortDirection::Desc)),
            base().with_sort(SortState::by("period", SortDirection::Asc)),
            base().with_sort(SortState::by("amount", SortDirection::Desc)),
            base().with_filter(FilterField::CategoryType, ["income"]),
            base().with_date(DatePart::From, NaiveDate::from_ymd_opt(2024, 1, 1)),
            base().with_date(DatePart::To, NaiveDate::from_ymd_opt(2024, 1, 31)),
        ];

        for variant in variants {
            assert_ne!(
                build_key(Resource::Entries, &variant),
                reference,
                "{variant:?} should change the key"
            );
        }
    }

    #[test]
    fn sort_column_order_changes_the_key() {
        let ab = SortState::new().toggled("b").toggled("a");
        let ba = SortState::new().toggled("a").toggled("b");

        assert_ne!(
            build_key(Resource::Categories, &FilterState::default().with_sort(ab)),
            build_key(Resource::Categories, &FilterState::default().with_sort(ba))
        );
    }

    #[test]
    fn resource_is_part_of_the_key() {
        let state = FilterState::default();
        let key = build_key(Resource::Categories, &state);

        assert_ne!(key, build_key(Resource::CostCenters, &state));
        assert_eq!(key.resource(), Resource::Categories);
        assert!(key.to_string().starts_with("categories:"));
    }
}
