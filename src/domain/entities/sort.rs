use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Header indicator shown for a sortable column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortIndicator {
    Neutral,
    Ascending,
    Descending,
}

/// Ordered multi-column sort. Columns and directions are kept as parallel
/// sequences; index 0 is the primary sort key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SortState {
    columns: Vec<String>,
    directions: Vec<SortDirection>,
}

impl SortState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn by(column: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            columns: vec![column.into()],
            directions: vec![direction],
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn directions(&self) -> &[SortDirection] {
        &self.directions
    }

    pub fn pairs(&self) -> impl Iterator<Item = (&str, SortDirection)> + '_ {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.directions.iter().copied())
    }

    pub fn direction_of(&self, column: &str) -> Option<SortDirection> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|idx| self.directions[idx])
    }

    pub fn indicator_for(&self, column: &str) -> SortIndicator {
        match self.direction_of(column) {
            None => SortIndicator::Neutral,
            Some(SortDirection::Asc) => SortIndicator::Ascending,
            Some(SortDirection::Desc) => SortIndicator::Descending,
        }
    }

    pub fn toggled(&self, clicked: &str) -> SortState {
        apply_sort_click(self, clicked)
    }
}

/// Header click cycle for one column: absent -> asc (inserted as primary),
/// asc -> desc (position kept), desc -> removed.
pub fn apply_sort_click(current: &SortState, clicked: &str) -> SortState {
    let mut next = current.clone();
    match next.columns.iter().position(|c| c == clicked) {
        None => {
            next.columns.insert(0, clicked.to_string());
            next.directions.insert(0, SortDirection::Asc);
        }
        Some(idx) => match next.directions[idx] {
            SortDirection::Asc => next.directions[idx] = SortDirection::Desc,
            SortDirection::Desc => {
                next.columns.remove(idx);
                next.directions.remove(idx);
            }
        },
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_column_becomes_primary_ascending() {
        let current = SortState::by("period", SortDirection::Desc);

        let next = apply_sort_click(&current, "amount");

        assert_eq!(next.columns(), ["amount", "period"]);
        assert_eq!(next.directions(), [SortDirection::Asc, SortDirection::Desc]);
    }

    #[test]
    fn toggling_secondary_column_keeps_its_position() {
        let current = SortState::new().toggled("period").toggled("amount");
        assert_eq!(current.columns(), ["amount", "period"]);

        let next = apply_sort_click(&current, "period");

        assert_eq!(next.columns(), ["amount", "period"]);
        assert_eq!(next.directions(), [SortDirection::Asc, SortDirection::Desc]);
    }

    #[test]
    fn click_cycle_returns_to_absent() {
        let mut state = SortState::new();
        let mut seen = Vec::new();
        for _ in 0..6 {
            state = state.toggled("name");
            assert_eq!(state.columns().len(), state.directions().len());
            seen.push(state.direction_of("name"));
        }

        assert_eq!(
            seen,
            vec![
                Some(SortDirection::Asc),
                Some(SortDirection::Desc),
                None,
                Some(SortDirection::Asc),
                Some(SortDirection::Desc),
                None,
            ]
        );
    }

    #[test]
    fn cycle_on_one_column_leaves_others_untouched() {
        let mut state = SortState::by("period", SortDirection::Desc);
        for _ in 0..3 {
            state = state.toggled("name");
        }

        assert_eq!(state, SortState::by("period", SortDirection::Desc));
    }

    #[test]
    fn indicator_reflects_sort_arrays() {
        let state = SortState::new()
            .toggled("type")
            .toggled("name")
            .toggled("name");
        assert_eq!(state.columns(), ["name", "type"]);

        assert_eq!(state.indicator_for("name"), SortIndicator::Descending);
        assert_eq!(state.indicator_for("type"), SortIndicator::Ascending);
        assert_eq!(state.indicator_for("amount"), SortIndicator::Neutral);
    }
}
