use serde::Serialize;

pub const DEFAULT_SIBLING_COUNT: i64 = 1;

/// One slot in a compact pager.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase", tag = "kind", content = "page")]
pub enum PageItem {
  Page(i64),
  /// A collapsed run of at least two hidden pages.
  Gap,
}

pub fn total_pages(total_count: i64, page_size: i64) -> i64 {
  if total_count <= 0 || page_size <= 0 {
    return 0;
  }
  total_count / page_size + i64::from(total_count % page_size != 0)
}

/// Builds the page labels for a pager showing `current_page`.
///
/// The first and last pages are always present, `sibling_count` pages are
/// shown on each side of the current one, and runs of two or more hidden
/// pages collapse into a single `Gap`. Once there are enough pages to need a
/// gap the output length stays at `2 * sibling_count + 5`. Invalid input
/// yields an empty range.
pub fn compute_range(
  current_page: i64,
  total_count: i64,
  page_size: i64,
  sibling_count: i64,
) -> Vec<PageItem> {
  if current_page <= 0 || sibling_count < 0 {
    return Vec::new();
  }
  let total = total_pages(total_count, page_size);
  if total == 0 {
    return Vec::new();
  }

  // Saturates for huge sibling counts, which then simply list every page.
  let visible_slots = sibling_count.saturating_mul(2).saturating_add(5);
  if total <= visible_slots {
    return pages(1, total).collect();
  }

  let current = current_page.min(total);
  let left = (current - sibling_count).max(1);
  let right = current.saturating_add(sibling_count).min(total);
  let show_left_gap = left > 3;
  let show_right_gap = right < total - 2;
  let edge_block = 3 + 2 * sibling_count;

  let mut range = Vec::with_capacity(visible_slots as usize);
  match (show_left_gap, show_right_gap) {
    (false, true) => {
      range.extend(pages(1, edge_block));
      range.push(PageItem::Gap);
      range.push(PageItem::Page(total));
    }
    (true, false) => {
      range.push(PageItem::Page(1));
      range.push(PageItem::Gap);
      range.extend(pages(total - edge_block + 1, total));
    }
    (true, true) => {
      range.push(PageItem::Page(1));
      range.push(PageItem::Gap);
      range.extend(pages(left, right));
      range.push(PageItem::Gap);
      range.push(PageItem::Page(total));
    }
    // Not reachable with more than `visible_slots` pages.
    (false, false) => range.extend(pages(1, total)),
  }
  range
}

pub fn previous_page(current_page: i64) -> Option<i64> {
  (current_page > 1).then(|| current_page - 1)
}

pub fn next_page(current_page: i64, total_pages: i64) -> Option<i64> {
  (current_page >= 1 && current_page < total_pages).then(|| current_page + 1)
}

/// A pager is only worth drawing when there is more than one page.
pub fn should_render_pager(
  current_page: i64,
  total_count: i64,
  page_size: i64,
  sibling_count: i64,
) -> bool {
  total_count > page_size
    && compute_range(current_page, total_count, page_size, sibling_count).len() >= 2
}

fn pages(start: i64, end: i64) -> impl Iterator<Item = PageItem> {
  (start..=end).map(PageItem::Page)
}
