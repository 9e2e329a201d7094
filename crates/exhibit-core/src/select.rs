//! Selection of the next-ending exhibits.

use chrono::NaiveDate;

use crate::listing::ExhibitRecord;

/// Number of exhibits read out when no limit is configured.
pub const DEFAULT_LIMIT: usize = 3;

/// Select the next `limit` exhibits ending on or after `cutoff`.
///
/// `sorted` must be ordered ascending by end date. The cut never splits a group
/// of exhibits sharing the boundary end date: every record tied with the
/// `limit`-th one is included as well.
pub fn select_next_ending(
    sorted: &[ExhibitRecord],
    cutoff: Option<NaiveDate>,
    limit: usize,
) -> &[ExhibitRecord] {
    let start = cutoff.map_or(0, |cutoff| {
        sorted.partition_point(|record| record.end_date() < cutoff)
    });
    let candidates = &sorted[start..];

    if limit == 0 || candidates.is_empty() {
        return &[];
    }
    if limit >= candidates.len() {
        return candidates;
    }

    let boundary = candidates[limit - 1].end_date();
    let tied = candidates[limit..]
        .iter()
        .take_while(|record| record.end_date() == boundary)
        .count();

    &candidates[..limit + tied]
}
