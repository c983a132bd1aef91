use crate::error::{AdminError, Result};

pub const ROWS_PER_PAGE_OPTIONS: [u32; 3] = [5, 10, 15];
pub const DEFAULT_ROWS_PER_PAGE: u32 = 5;

/// Page index and page size for the user table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    page: u32,
    rows_per_page: u32,
}

impl Default for Pager {
    fn default() -> Self {
        Self {
            page: 0,
            rows_per_page: DEFAULT_ROWS_PER_PAGE,
        }
    }
}

impl Pager {
    pub fn new(rows_per_page: u32) -> Result<Self> {
        check_rows_per_page(rows_per_page)?;
        Ok(Self {
            page: 0,
            rows_per_page,
        })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn rows_per_page(&self) -> u32 {
        self.rows_per_page
    }

    pub fn skip(&self) -> u32 {
        self.page.saturating_mul(self.rows_per_page)
    }

    pub fn limit(&self) -> u32 {
        self.rows_per_page
    }

    /// Zero-based index of the last page that holds any of `total` rows.
    pub fn last_page(&self, total: u64) -> u32 {
        if total == 0 {
            return 0;
        }
        let last = (total - 1) / u64::from(self.rows_per_page);
        u32::try_from(last).unwrap_or(u32::MAX)
    }

    pub fn go_to(&mut self, page: u32) {
        self.page = page;
    }

    /// Advances one page. Returns `false` when already on the last page.
    pub fn next(&mut self, total: u64) -> bool {
        if self.page >= self.last_page(total) {
            return false;
        }
        self.page += 1;
        true
    }

    pub fn prev(&mut self) -> bool {
        if self.page == 0 {
            return false;
        }
        self.page -= 1;
        true
    }

    /// Changes the page size and returns to the first page.
    pub fn set_rows_per_page(&mut self, rows_per_page: u32) -> Result<()> {
        check_rows_per_page(rows_per_page)?;
        self.rows_per_page = rows_per_page;
        self.page = 0;
        Ok(())
    }

    /// `"{from}-{to} of {total}"`, e.g. `"6-10 of 208"`.
    pub fn label(&self, total: u64) -> String {
        let skip = u64::from(self.skip());
        let from = if total == 0 { 0 } else { skip + 1 };
        let to = total.min(skip + u64::from(self.rows_per_page));
        format!("{from}-{to} of {total}")
    }
}

pub fn check_rows_per_page(rows_per_page: u32) -> Result<()> {
    if ROWS_PER_PAGE_OPTIONS.contains(&rows_per_page) {
        Ok(())
    } else {
        Err(AdminError::InvalidPageSize(rows_per_page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skip_and_limit_follow_page() {
        let mut pager = Pager::new(10).unwrap();
        assert_eq!((pager.skip(), pager.limit()), (0, 10));

        pager.go_to(3);
        assert_eq!((pager.skip(), pager.limit()), (30, 10));
    }

    #[test]
    fn rejects_unlisted_page_sizes() {
        assert!(matches!(Pager::new(7), Err(AdminError::InvalidPageSize(7))));
        assert!(matches!(Pager::new(0), Err(AdminError::InvalidPageSize(0))));

        let mut pager = Pager::default();
        pager.go_to(2);
        assert!(pager.set_rows_per_page(20).is_err());
        assert_eq!(pager.page(), 2);
        assert_eq!(pager.rows_per_page(), 5);
    }

    #[test]
    fn changing_page_size_resets_to_first_page() {
        let mut pager = Pager::default();
        pager.go_to(4);

        pager.set_rows_per_page(15).unwrap();

        assert_eq!(pager.page(), 0);
        assert_eq!(pager.limit(), 15);
    }

    #[test]
    fn next_and_prev_stay_in_bounds() {
        let mut pager = Pager::default();
        assert!(!pager.prev());

        assert!(pager.next(12));
        assert!(pager.next(12));
        assert!(!pager.next(12));
        assert_eq!(pager.page(), 2);

        assert!(pager.prev());
        assert_eq!(pager.page(), 1);

        let mut empty = Pager::default();
        assert!(!empty.next(0));
    }

    #[test]
    fn last_page_on_exact_multiple() {
        let pager = Pager::default();
        assert_eq!(pager.last_page(50), 9);
        assert_eq!(pager.last_page(51), 10);
        assert_eq!(pager.last_page(0), 0);
    }

    #[test]
    fn label_matches_table_footer() {
        let mut pager = Pager::default();
        assert_eq!(pager.label(208), "1-5 of 208");

        pager.go_to(1);
        assert_eq!(pager.label(208), "6-10 of 208");

        pager.go_to(2);
        assert_eq!(pager.label(12), "11-12 of 12");

        assert_eq!(Pager::default().label(0), "0-0 of 0");
    }
}
