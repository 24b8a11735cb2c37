use std::sync::Arc;

use tracing::warn;

use crate::domain::entities::record::{
    yearly_balance, CategoryKind, MonthlySummary, MonthlyTotals,
};
use crate::usecase::ports::data_source::{ApiError, DashboardSource};

#[derive(Debug, Clone, PartialEq)]
pub struct YearOverview {
    pub year: i32,
    pub months: Vec<MonthlySummary>,
    pub balance: f64,
}

pub struct DashboardService {
    source: Arc<dyn DashboardSource>,
}

impl DashboardService {
    pub fn new(source: Arc<dyn DashboardSource>) -> Self {
        Self { source }
    }

    pub fn year_overview(&self, year: i32) -> Result<YearOverview, ApiError> {
        let months = self.source.yearly_summary(year).inspect_err(|err| {
            warn!(year, error = %err, "yearly summary failed");
        })?;
        Ok(YearOverview {
            year,
            balance: yearly_balance(&months),
            months,
        })
    }

    /// Category totals, largest first within income then expense.
    pub fn month_totals(&self, year: i32, month: u32) -> Result<MonthlyTotals, ApiError> {
        let mut totals = self.source.monthly_totals(year, month).inspect_err(|err| {
            warn!(year, month, error = %err, "monthly totals failed");
        })?;
        totals.totals.sort_by(|a, b| {
            (a.kind == CategoryKind::Expense)
                .cmp(&(b.kind == CategoryKind::Expense))
                .then(b.total.total_cmp(&a.total))
        });
        Ok(totals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::record::{CategoryTotal, RowId};

    struct FixedSource;

    fn total(id: i64, name: &str, kind: CategoryKind, amount: f64) -> CategoryTotal {
        CategoryTotal {
            category_id: RowId::from(id),
            category_name: name.to_string(),
            kind,
            total: amount,
        }
    }

    impl DashboardSource for FixedSource {
        fn yearly_summary(&self, _year: i32) -> Result<Vec<MonthlySummary>, ApiError> {
            Ok(vec![
                MonthlySummary {
                    month: "2024-01".into(),
                    income: 900.0,
                    expense: 300.0,
                },
                MonthlySummary {
                    month: "2024-02".into(),
                    income: 100.0,
                    expense: 250.0,
                },
            ])
        }

        fn monthly_totals(&self, year: i32, month: u32) -> Result<MonthlyTotals, ApiError> {
            if month > 12 {
                return Err(ApiError::Status {
                    status: 400,
                    message: Some("Invalid month".into()),
                });
            }
            Ok(MonthlyTotals {
                year,
                month,
                totals: vec![
                    total(1, "Food", CategoryKind::Expense, 120.0),
                    total(2, "Salary", CategoryKind::Income, 900.0),
                    total(3, "Rent", CategoryKind::Expense, 700.0),
                    total(4, "Gift", CategoryKind::Income, 50.0),
                ],
            })
        }
    }

    #[test]
    fn year_overview_sums_monthly_balances() {
        let service = DashboardService::new(Arc::new(FixedSource));

        let overview = service.year_overview(2024).expect("overview should load");

        assert_eq!(overview.year, 2024);
        assert_eq!(overview.months.len(), 2);
        assert_eq!(overview.balance, 450.0);
    }

    #[test]
    fn month_totals_list_income_first_then_largest() {
        let service = DashboardService::new(Arc::new(FixedSource));

        let totals = service.month_totals(2024, 3).expect("totals should load");

        let names: Vec<&str> = totals
            .totals
            .iter()
            .map(|t| t.category_name.as_str())
            .collect();
        assert_eq!(names, vec!["Salary", "Gift", "Rent", "Food"]);
        assert_eq!(totals.balance(), 130.0);
    }

    #[test]
    fn month_totals_pass_errors_through() {
        let service = DashboardService::new(Arc::new(FixedSource));

        let err = service.month_totals(2024, 13).expect_err("bad month should fail");

        assert_eq!(err.user_message(), "Invalid month");
    }
}
