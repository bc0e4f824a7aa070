//! Page-strip computation for the customer table footer.

pub fn total_pages(total: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    let pages = total.div_ceil(u64::from(page_size));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Page numbers to show around `current`, with `None` marking a gap.
///
/// Keeps `edge` pages at each end plus `before` pages before and `after`
/// pages after the current one.
pub fn page_window(
    total_pages: u32,
    current: u32,
    edge: u32,
    before: u32,
    after: u32,
) -> Vec<Option<u32>> {
    if total_pages == 0 {
        return Vec::new();
    }
    // Exclusive bounds run one past `u32::MAX` for the largest page counts.
    let last = u64::from(total_pages);
    let current = u64::from(current.clamp(1, total_pages));
    let (edge, before, after) = (u64::from(edge), u64::from(before), u64::from(after));
    let page = |n: u64| Some(n as u32);

    let mut pages = Vec::new();

    let left_end = (1 + edge).min(last + 1);
    pages.extend((1..left_end).map(page));

    let mid_start = left_end.max(current.saturating_sub(before));
    let mid_end = (current + after + 1).min(last + 1);
    if mid_start > left_end {
        pages.push(None);
    }
    pages.extend((mid_start..mid_end).map(page));

    let right_start = mid_end.max(last.saturating_sub(edge) + 1);
    if right_start > mid_end {
        pages.push(None);
    }
    pages.extend((right_start..=last).map(page));

    pages
}

/// Strip used by the desktop footer and the CLI summary.
pub fn default_page_window(total_pages: u32, current: u32) -> Vec<Option<u32>> {
    page_window(total_pages, current, 1, 2, 2)
}

/// Footer line, e.g. "Page 2 of 3 (23 customers)".
pub fn page_summary(page: u32, total_pages: u32, total: u64) -> String {
    let noun = if total == 1 { "customer" } else { "customers" };
    format!("Page {page} of {} ({total} {noun})", total_pages.max(1))
}
