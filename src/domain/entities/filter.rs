use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use crate::domain::entities::sort::SortState;

pub const DEFAULT_ITEMS_PER_PAGE: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FilterField {
    CategoryId,
    CategoryType,
    PaymentTypeId,
}

impl FilterField {
    /// Request parameter name understood by the list endpoints.
    pub fn param_name(self) -> &'static str {
        match self {
            FilterField::CategoryId => "category_id",
            FilterField::CategoryType => "category_type",
            FilterField::PaymentTypeId => "payment_type_id",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FilterField::CategoryId => "Category",
            FilterField::CategoryType => "Type",
            FilterField::PaymentTypeId => "Payment type",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePart {
    From,
    To,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    /// `from` later than `to`. Such ranges are still sent as-is.
    pub fn is_inverted(&self) -> bool {
        matches!((self.from, self.to), (Some(from), Some(to)) if from > to)
    }
}

/// Everything a list view asks of the server: search, sort, filters,
/// date range and page. Transitions return a new state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilterState {
    search: String,
    sort: SortState,
    filters: BTreeMap<FilterField, BTreeSet<String>>,
    date_range: DateRange,
    page: u32,
    items_per_page: u32,
}

impl Default for FilterState {
    fn default() -> Self {
        Self::new(DEFAULT_ITEMS_PER_PAGE)
    }
}

impl FilterState {
    pub fn new(items_per_page: u32) -> Self {
        Self {
            search: String::new(),
            sort: SortState::new(),
            filters: BTreeMap::new(),
            date_range: DateRange::default(),
            page: 1,
            items_per_page: items_per_page.max(1),
        }
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn sort(&self) -> &SortState {
        &self.sort
    }

    pub fn filters(&self) -> &BTreeMap<FilterField, BTreeSet<String>> {
        &self.filters
    }

    pub fn filter_values(&self, field: FilterField) -> Option<&BTreeSet<String>> {
        self.filters.get(&field)
    }

    pub fn date_range(&self) -> DateRange {
        self.date_range
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn items_per_page(&self) -> u32 {
        self.items_per_page
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self.page = 1;
        self
    }

    /// Replaces the selection for `field`. An empty selection removes the
    /// field entirely so it is never sent.
    pub fn with_filter<I, S>(mut self, field: FilterField, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: BTreeSet<String> = values
            .into_iter()
            .map(Into::into)
            .filter(|v| !v.trim().is_empty())
            .collect();
        if values.is_empty() {
            self.filters.remove(&field);
        } else {
            self.filters.insert(field, values);
        }
        self.page = 1;
        self
    }

    pub fn with_date(mut self, part: DatePart, value: Option<NaiveDate>) -> Self {
        match part {
            DatePart::From => self.date_range.from = value,
            DatePart::To => self.date_range.to = value,
        }
        self.page = 1;
        self
    }

    /// Sets the page; values below 1 clamp to 1.
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    pub fn with_sort(mut self, sort: SortState) -> Self {
        self.sort = sort;
        self
    }
}
