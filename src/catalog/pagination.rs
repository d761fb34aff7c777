/// One page of a client-side paginated list.
#[derive(Clone, Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: usize,
    pub current_page: usize,
    pub total_pages: usize,
    pub per_page: usize,
}

impl<T: Clone> Page<T> {
    /// `page == 0` or `per_page == 0` returns everything on a single page.
    /// Pages past the end clamp to the last page.
    pub fn of(all: &[T], page: usize, per_page: usize) -> Self {
        let total_count = all.len();

        if page == 0 || per_page == 0 {
            return Page {
                items: all.to_vec(),
                total_count,
                current_page: 0,
                total_pages: 1,
                per_page: total_count,
            };
        }

        let total_pages = if total_count == 0 {
            1
        } else {
            total_count.div_ceil(per_page)
        };

        let current_page = page.max(1).min(total_pages);
        let start_idx = (current_page - 1) * per_page;
        let end_idx = start_idx.saturating_add(per_page).min(total_count);

        let items = if start_idx < total_count {
            all[start_idx..end_idx].to_vec()
        } else {
            vec![]
        };

        Page {
            items,
            total_count,
            current_page,
            total_pages,
            per_page,
        }
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page > 0 && self.current_page < self.total_pages
    }
}
