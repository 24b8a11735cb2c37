use crate::domain::entities::filter::DEFAULT_ITEMS_PER_PAGE;

/// One server page of rows plus the full matching count and optional sum.
#[derive(Debug, Clone, PartialEq)]
pub struct ListPage<R> {
    pub rows: Vec<R>,
    /// Full server-side match count. Some endpoints omit it.
    pub total: Option<u64>,
    pub total_amount: Option<f64>,
    pub page: u32,
    pub items_per_page: u32,
}

impl<R> Default for ListPage<R> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            total: Some(0),
            total_amount: None,
            page: 1,
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
        }
    }
}

impl<R> ListPage<R> {
    pub fn page_count(&self) -> u32 {
        page_count(self.total.unwrap_or(0), self.items_per_page)
    }

    pub fn has_next(&self) -> bool {
        has_next_page(self.page, self.items_per_page, self.total, self.rows.len())
    }

    /// Last existing page when `requested` is past it, e.g. after deleting
    /// the only row of the last page. `None` if the total is unknown.
    pub fn clamp_page(&self, requested: u32) -> Option<u32> {
        if self.total.is_none() {
            return None;
        }
        let last = self.page_count().max(1);
        (requested > last).then_some(last)
    }
}

pub fn page_count(total: u64, items_per_page: u32) -> u32 {
    if items_per_page == 0 {
        return 0;
    }
    let pages = total.div_ceil(u64::from(items_per_page));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

pub fn has_previous_page(page: u32) -> bool {
    page > 1
}

/// Trusts `total` when the server sent it; otherwise a short page is taken
/// as the last one.
pub fn has_next_page(page: u32, items_per_page: u32, total: Option<u64>, row_count: usize) -> bool {
    match total {
        Some(total) => u64::from(page) * u64::from(items_per_page) < total,
        None => row_count >= items_per_page as usize && row_count > 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(page_count(95, 10), 10);
        assert_eq!(page_count(100, 10), 10);
        assert_eq!(page_count(101, 10), 11);
        assert_eq!(page_count(0, 10), 0);
        assert_eq!(page_count(5, 0), 0);
    }

    #[test]
    fn has_next_uses_total_when_known() {
        assert!(has_next_page(1, 10, Some(11), 10));
        assert!(!has_next_page(2, 10, Some(20), 10));
        assert!(!has_next_page(1, 10, Some(0), 0));
        assert!(!has_next_page(1, 10, Some(3), 3));
    }

    #[test]
    fn has_next_falls_back_to_row_count() {
        assert!(has_next_page(1, 10, None, 10));
        assert!(!has_next_page(1, 10, None, 9));
        assert!(!has_next_page(1, 10, None, 0));
    }

    #[test]
    fn page_past_the_end_clamps_to_last() {
        let page = ListPage::<u32> {
            rows: Vec::new(),
            total: Some(20),
            total_amount: None,
            page: 3,
            items_per_page: 10,
        };
        assert_eq!(page.clamp_page(3), Some(2));
        assert_eq!(page.clamp_page(2), None);

        let emptied = ListPage::<u32> {
            total: Some(0),
            page: 2,
            ..ListPage::default()
        };
        assert_eq!(emptied.clamp_page(2), Some(1));
        assert_eq!(emptied.clamp_page(1), None);

        let unknown = ListPage::<u32> {
            total: None,
            page: 4,
            ..ListPage::default()
        };
        assert_eq!(unknown.clamp_page(4), None);
    }

    #[test]
    fn previous_disabled_on_first_page() {
        assert!(!has_previous_page(1));
        assert!(has_previous_page(2));
    }
}
