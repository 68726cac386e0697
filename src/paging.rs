use std::fmt;

/// 1-indexed page slice. Out-of-range page numbers (including page 0) give
/// an empty slice rather than an error.
pub fn page<T>(data: &[T], page_number: usize, page_size: usize) -> &[T] {
    if page_number == 0 || page_size == 0 {
        return &[];
    }
    let start = (page_number - 1).saturating_mul(page_size);
    if start >= data.len() {
        return &[];
    }
    let end = (start + page_size).min(data.len());
    &data[start..end]
}

pub fn page_count(len: usize, page_size: usize) -> usize {
    if page_size == 0 { 0 } else { len.div_ceil(page_size) }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLabel {
    Num(usize),
    Gap,
}

impl fmt::Display for PageLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageLabel::Num(n) => write!(f, "{n}"),
            PageLabel::Gap => write!(f, "..."),
        }
    }
}

/// Condensed page label sequence: everything when total fits in 7 slots,
/// otherwise first and last page, a window of current±1 clamped to the
/// interior, and a single gap marker on each side where pages are skipped.
pub fn page_numbers(current: usize, total: usize) -> Vec<PageLabel> {
    use PageLabel::{Gap, Num};

    if total <= 7 {
        return (1..=total).map(Num).collect();
    }

    let mut pages = vec![Num(1)];
    if current > 3 {
        pages.push(Gap);
    }
    let low = current.saturating_sub(1).max(2);
    let high = (current + 1).min(total - 1);
    for n in low..=high {
        pages.push(Num(n));
    }
    if current + 2 < total {
        pages.push(Gap);
    }
    pages.push(Num(total));
    pages
}

#[cfg(test)]
mod tests {
    use super::*;
    use PageLabel::{Gap, Num};

    #[test]
    fn page_slices_are_one_indexed() {
        let data: Vec<u32> = (1..=25).collect();
        assert_eq!(page(&data, 1, 10), &data[0..10]);
        assert_eq!(page(&data, 3, 10), &data[20..25]);
    }

    #[test]
    fn out_of_range_pages_are_empty() {
        let data: Vec<u32> = (1..=25).collect();
        assert!(page(&data, 4, 10).is_empty());
        assert!(page(&data, 100, 10).is_empty());
        assert!(page(&data, 0, 10).is_empty());
        assert!(page::<u32>(&[], 1, 10).is_empty());
    }

    #[test]
    fn paging_is_idempotent() {
        let data: Vec<u32> = (1..=42).collect();
        assert_eq!(page(&data, 2, 10), page(&data, 2, 10));
    }

    #[test]
    fn small_totals_list_every_page() {
        assert_eq!(
            page_numbers(3, 7),
            vec![Num(1), Num(2), Num(3), Num(4), Num(5), Num(6), Num(7)]
        );
        assert_eq!(page_numbers(1, 1), vec![Num(1)]);
        assert!(page_numbers(1, 0).is_empty());
    }

    #[test]
    fn middle_page_gets_gaps_on_both_sides() {
        assert_eq!(
            page_numbers(5, 10),
            vec![Num(1), Gap, Num(4), Num(5), Num(6), Gap, Num(10)]
        );
    }

    #[test]
    fn edge_pages_get_one_gap() {
        assert_eq!(
            page_numbers(1, 10),
            vec![Num(1), Num(2), Gap, Num(10)]
        );
        assert_eq!(
            page_numbers(10, 10),
            vec![Num(1), Gap, Num(9), Num(10)]
        );
    }

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(page_count(0, 10), 0);
        assert_eq!(page_count(10, 10), 1);
        assert_eq!(page_count(11, 10), 2);
    }
}
