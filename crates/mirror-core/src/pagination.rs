use crate::error::Result;

/// Page size used for every listing call
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Helper function to fetch all pages of a resource.
///
/// Pages are numbered from 1. A page holding fewer than `per_page` items
/// (including an empty one) is treated as the last page.
pub fn fetch_all_pages<T, F>(mut fetch_page: F, per_page: usize) -> Result<Vec<T>>
where
    F: FnMut(usize, usize) -> Result<Vec<T>>,
{
    let mut all_results = Vec::new();
    let mut page = 1;

    loop {
        let page_results = fetch_page(page, per_page)?;
        let page_len = page_results.len();

        all_results.extend(page_results);

        if page_len < per_page {
            break;
        }

        page += 1;
    }

    Ok(all_results)
}
