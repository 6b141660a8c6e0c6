//! Patience-sorting longest increasing subsequence.

/// Indices into `seq` forming a longest strictly increasing subsequence, in
/// ascending index order.
///
/// Among equally long answers this prefers ones that start earlier in `seq`:
/// the piles are built right to left, so for `[1, 0]` it keeps index 0.
pub(crate) fn longest_increasing(seq: &[usize]) -> Vec<usize> {
    // Right to left, a strictly increasing run reads as strictly decreasing.
    // tails[k] is the index whose value is the largest possible last-seen
    // element of a decreasing run of length k + 1.
    let mut tails: Vec<usize> = Vec::new();
    let mut prev: Vec<Option<usize>> = vec![None; seq.len()];

    for idx in (0..seq.len()).rev() {
        let v = seq[idx];
        // first pile whose top is <= v; v can't extend it, so it replaces it
        let pile = tails.partition_point(|&t| seq[t] > v);
        if pile > 0 {
            prev[idx] = Some(tails[pile - 1]);
        }
        if pile == tails.len() {
            tails.push(idx);
        } else {
            tails[pile] = idx;
        }
    }

    let mut out = Vec::with_capacity(tails.len());
    let mut cur = tails.last().copied();
    while let Some(idx) = cur {
        out.push(idx);
        cur = prev[idx];
    }
    out
}
