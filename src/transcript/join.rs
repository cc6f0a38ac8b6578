/// Backward-nearest join of `items` onto `targets`, both sorted ascending.
///
/// For every item, returns the index of the last target whose start is
/// `<=` the item's start, or `None` when the item precedes every target.
/// Runs as a single two-pointer pass.
pub fn backward_nearest(targets: &[f64], items: &[f64]) -> Vec<Option<usize>> {
    let mut matches = Vec::with_capacity(items.len());
    // Number of targets starting at or before the current item.
    let mut passed = 0usize;
    for &item in items {
        while passed < targets.len() && targets[passed] <= item {
            passed += 1;
        }
        matches.push(passed.checked_sub(1));
    }
    matches
}

/// 1-based rank of each element by `starts` within its group; ties keep the
/// original order.
pub fn rank_within_groups(groups: &[usize], starts: &[f64]) -> Vec<usize> {
    debug_assert_eq!(groups.len(), starts.len());
    let mut order = (0..groups.len()).collect::<Vec<_>>();
    order.sort_by(|&a, &b| {
        groups[a]
            .cmp(&groups[b])
            .then_with(|| starts[a].total_cmp(&starts[b]))
    });

    let mut ranks = vec![0usize; groups.len()];
    let mut current_group = None;
    let mut rank = 0usize;
    for i in order {
        if current_group != Some(groups[i]) {
            current_group = Some(groups[i]);
            rank = 0;
        }
        rank += 1;
        ranks[i] = rank;
    }
    ranks
}

/// Index of the first value smaller than its predecessor.
pub(crate) fn first_unsorted(starts: impl IntoIterator<Item = f64>) -> Option<usize> {
    let mut previous = f64::NEG_INFINITY;
    for (i, start) in starts.into_iter().enumerate() {
        if start < previous {
            return Some(i);
        }
        previous = start;
    }
    None
}
