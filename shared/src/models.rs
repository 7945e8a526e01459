/// One page of the file listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingPage {
    /// Requested page, 1-indexed. Not clamped.
    pub page: i64,
    pub total_pages: usize,
    pub total_files: usize,
    pub files: Vec<String>,
}

impl ListingPage {
    /// Slice an already sorted file list into the window for `page`.
    ///
    /// Out-of-range pages, including pages below 1, give an empty window.
    pub fn paginate(files: Vec<String>, page: i64, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        let total_files = files.len();
        let total_pages = total_files.div_ceil(page_size);

        let start = usize::try_from(page - 1)
            .ok()
            .and_then(|p| p.checked_mul(page_size))
            .unwrap_or(usize::MAX)
            .min(total_files);
        let end = start.saturating_add(page_size).min(total_files);
        let window = if page < 1 {
            Vec::new()
        } else {
            files.into_iter().skip(start).take(end - start).collect()
        };

        Self {
            page,
            total_pages,
            total_files,
            files: window,
        }
    }

    pub fn previous_page(&self) -> Option<i64> {
        (self.page > 1).then(|| self.page - 1)
    }

    pub fn next_page(&self) -> Option<i64> {
        let total = i64::try_from(self.total_pages).unwrap_or(i64::MAX);
        (self.page < total).then(|| self.page + 1)
    }
}
