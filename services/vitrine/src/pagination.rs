//! Pagination over an in-memory record set

use crate::record::Record;

/// Slice out the 1-based `page` of `records`.
///
/// Never errors: slice bounds are clamped to the sequence length, so an
/// out-of-range page yields a shorter or empty slice.
pub fn paginate(records: &[Record], page: usize, page_size: usize) -> &[Record] {
    if page == 0 || page_size == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(page_size).min(records.len());
    let end = start.saturating_add(page_size).min(records.len());
    &records[start..end]
}

/// Number of pages needed to show `len` records; at least 1 so the page
/// input always has a valid range
pub fn page_count(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    len.div_ceil(page_size).max(1)
}

/// Clamp a requested page number into `[1, page_count]`
pub fn clamp_page(page: usize, len: usize, page_size: usize) -> usize {
    page.clamp(1, page_count(len, page_size))
}
