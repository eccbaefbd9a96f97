/// Rows returned per list call.
pub const PAGE_SIZE: u64 = 5;

/// Number of pages needed to show `total_count` rows, `page_size` per page.
///
/// A zero `page_size` yields zero pages rather than dividing by zero.
pub fn total_pages(total_count: u64, page_size: u64) -> u64 {
    if page_size == 0 {
        return 0;
    }
    total_count.div_ceil(page_size)
}
