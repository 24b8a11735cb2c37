use std::fmt;

use crate::domain::entities::filter::FilterField;
use crate::domain::entities::sort::{SortDirection, SortState};

/// Remote collections served by the finance API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Resource {
    Entries,
    Categories,
    CostCenters,
    PaymentTypes,
    RecurringEntries,
}

impl Resource {
    pub const ALL: [Resource; 5] = [
        Resource::Entries,
        Resource::Categories,
        Resource::CostCenters,
        Resource::PaymentTypes,
        Resource::RecurringEntries,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Resource::Entries => "entries",
            Resource::Categories => "categories",
            Resource::CostCenters => "cost_centers",
            Resource::PaymentTypes => "payment_types",
            Resource::RecurringEntries => "recurring_entries",
        }
    }

    /// Collection path on the API.
    pub fn path(self) -> &'static str {
        match self {
            Resource::Entries => "/entries",
            Resource::Categories => "/categories",
            Resource::CostCenters => "/cost-center",
            Resource::PaymentTypes => "/payment_types",
            Resource::RecurringEntries => "/recurring_entry",
        }
    }

    /// Field of the list response that holds the rows.
    pub fn rows_key(self) -> &'static str {
        match self {
            Resource::Entries | Resource::RecurringEntries => "entries",
            Resource::Categories => "categories",
            Resource::CostCenters => "cost_centers",
            Resource::PaymentTypes => "paymentTypes",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Resource::Entries => "Entries",
            Resource::Categories => "Categories",
            Resource::CostCenters => "Cost centers",
            Resource::PaymentTypes => "Payment types",
            Resource::RecurringEntries => "Recurring entries",
        }
    }

    pub fn singular(self) -> &'static str {
        match self {
            Resource::Entries => "entry",
            Resource::Categories => "category",
            Resource::CostCenters => "cost center",
            Resource::PaymentTypes => "payment type",
            Resource::RecurringEntries => "recurring entry",
        }
    }

    pub fn default_sort(self) -> SortState {
        match self {
            Resource::Entries => SortState::by("period", SortDirection::Desc),
            _ => SortState::new(),
        }
    }

    pub fn filter_fields(self) -> &'static [FilterField] {
        match self {
            Resource::Entries => &[
                FilterField::CategoryId,
                FilterField::CategoryType,
                FilterField::PaymentTypeId,
            ],
            _ => &[],
        }
    }

    pub fn supports_date_range(self) -> bool {
        matches!(self, Resource::Entries)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
