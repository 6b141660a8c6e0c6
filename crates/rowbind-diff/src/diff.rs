use smallvec::SmallVec;

use crate::callback::ItemCallback;
use crate::lis::longest_increasing;
use crate::op::{ListOp, ListUpdateCallback};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DiffOptions {
    /// Emit `Move` for reordered rows instead of remove + insert.
    pub detect_moves: bool,
    /// Identity comparisons between two calls of the cancel check.
    pub cancel_check_interval: usize,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            detect_moves: true,
            cancel_check_interval: 64,
        }
    }
}

/// Outcome of diffing two list versions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiffResult {
    ops: SmallVec<[ListOp; 8]>,
    old_len: usize,
    new_len: usize,
    old_to_new: Vec<Option<usize>>,
    new_to_old: Vec<Option<usize>>,
}

impl DiffResult {
    pub fn ops(&self) -> &[ListOp] {
        &self.ops
    }
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
    pub fn old_len(&self) -> usize {
        self.old_len
    }
    pub fn new_len(&self) -> usize {
        self.new_len
    }

    /// Where the row at `old_position` ended up, if it survived.
    pub fn converted_old_position(&self, old_position: usize) -> Option<usize> {
        self.old_to_new.get(old_position).copied().flatten()
    }

    /// Where the row at `new_position` came from, if it existed before.
    pub fn converted_new_position(&self, new_position: usize) -> Option<usize> {
        self.new_to_old.get(new_position).copied().flatten()
    }

    pub fn dispatch_updates_to(&self, cb: &mut impl ListUpdateCallback) {
        for op in &self.ops {
            op.dispatch(cb);
        }
    }

    pub fn inserted(&self) -> usize {
        self.count(|op| match op {
            ListOp::Insert { count, .. } => *count,
            _ => 0,
        })
    }
    pub fn removed(&self) -> usize {
        self.count(|op| match op {
            ListOp::Remove { count, .. } => *count,
            _ => 0,
        })
    }
    pub fn moved(&self) -> usize {
        self.count(|op| matches!(op, ListOp::Move { .. }) as usize)
    }
    pub fn changed(&self) -> usize {
        self.count(|op| match op {
            ListOp::Change { count, .. } => *count,
            _ => 0,
        })
    }

    fn count(&self, f: impl Fn(&ListOp) -> usize) -> usize {
        self.ops.iter().map(f).sum()
    }

    pub fn script(&self) -> String {
        self.ops
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

pub fn calculate_diff<T, C>(old: &[T], new: &[T], cb: &C, opts: DiffOptions) -> DiffResult
where
    C: ItemCallback<T> + ?Sized,
{
    match calculate_diff_cancellable(old, new, cb, opts, &|| false) {
        Some(d) => d,
        None => unreachable!("diff without a cancel check can't be cancelled"),
    }
}

/// Like [`calculate_diff`], polling `cancelled` while it works. Returns
/// `None` as soon as the check reports true.
pub fn calculate_diff_cancellable<T, C>(
    old: &[T],
    new: &[T],
    cb: &C,
    opts: DiffOptions,
    cancelled: &dyn Fn() -> bool,
) -> Option<DiffResult>
where
    C: ItemCallback<T> + ?Sized,
{
    let (mut old_to_new, mut new_to_old) = match_items(old, new, cb, opts, cancelled)?;
    if cancelled() {
        return None;
    }

    // Matched pairs in old order; the increasing run among their new
    // positions stays in place.
    let matched: Vec<usize> = (0..old.len()).filter(|&i| old_to_new[i].is_some()).collect();
    let targets: Vec<usize> = matched.iter().filter_map(|&i| old_to_new[i]).collect();
    let mut stable = vec![false; new.len()];
    for k in longest_increasing(&targets) {
        stable[targets[k]] = true;
    }

    if !opts.detect_moves {
        for &i in &matched {
            if let Some(j) = old_to_new[i]
                && !stable[j]
            {
                old_to_new[i] = None;
                new_to_old[j] = None;
            }
        }
    }

    let mut ops: SmallVec<[ListOp; 8]> = SmallVec::new();

    // Removals, back to front so earlier positions stay valid.
    for i in (0..old.len()).rev() {
        if old_to_new[i].is_some() {
            continue;
        }
        match ops.last_mut() {
            Some(ListOp::Remove { position, count }) if *position == i + 1 => {
                *position = i;
                *count += 1;
            }
            _ => ops.push(ListOp::Remove {
                position: i,
                count: 1,
            }),
        }
    }

    // Surviving rows, by new position, in current order.
    let mut cur: Vec<usize> = old_to_new.iter().filter_map(|j| *j).collect();
    let mut placed = stable;

    // Each unstable row moves once, to just after the closest placed row that
    // precedes it in the new order.
    for j in 0..new.len() {
        if new_to_old[j].is_none() || placed[j] {
            continue;
        }
        let Some(from) = cur.iter().position(|&x| x == j) else {
            continue;
        };
        cur.remove(from);
        let to = cur
            .iter()
            .rposition(|&x| x < j && placed[x])
            .map_or(0, |q| q + 1);
        cur.insert(to, j);
        placed[j] = true;
        if from != to {
            ops.push(ListOp::Move { from, to });
        }
    }
    debug_assert!(cur.windows(2).all(|w| w[0] < w[1]));

    if cancelled() {
        return None;
    }

    // Insertions, front to back; everything before `j` is already in place.
    for (j, src) in new_to_old.iter().enumerate() {
        if src.is_some() {
            continue;
        }
        match ops.last_mut() {
            Some(ListOp::Insert { position, count }) if *position + *count == j => *count += 1,
            _ => ops.push(ListOp::Insert {
                position: j,
                count: 1,
            }),
        }
    }

    for (j, src) in new_to_old.iter().enumerate() {
        let Some(i) = *src else { continue };
        if cb.are_contents_the_same(&old[i], &new[j]) {
            continue;
        }
        match ops.last_mut() {
            Some(ListOp::Change { position, count }) if *position + *count == j => *count += 1,
            _ => ops.push(ListOp::Change {
                position: j,
                count: 1,
            }),
        }
    }

    log::trace!(
        "diff {} -> {} rows: {} steps",
        old.len(),
        new.len(),
        ops.len()
    );

    Some(DiffResult {
        ops,
        old_len: old.len(),
        new_len: new.len(),
        old_to_new,
        new_to_old,
    })
}

type Matching = (Vec<Option<usize>>, Vec<Option<usize>>);

/// Pairs every old row with at most one new row of the same identity.
///
/// The scan for each old row starts just past the previous match, so lists
/// that mostly keep their order match in close to linear time. Each side is
/// paired at most once whatever the predicate answers.
fn match_items<T, C>(
    old: &[T],
    new: &[T],
    cb: &C,
    opts: DiffOptions,
    cancelled: &dyn Fn() -> bool,
) -> Option<Matching>
where
    C: ItemCallback<T> + ?Sized,
{
    let mut old_to_new = vec![None; old.len()];
    let mut new_to_old = vec![None; new.len()];
    if old.is_empty() || new.is_empty() {
        return Some((old_to_new, new_to_old));
    }

    let interval = opts.cancel_check_interval.max(1);
    let mut checks = 0usize;
    let mut unmatched_new = new.len();
    let mut hint = 0usize;

    for (i, old_item) in old.iter().enumerate() {
        if unmatched_new == 0 {
            break;
        }
        for k in 0..new.len() {
            let j = (hint + k) % new.len();
            if new_to_old[j].is_some() {
                continue;
            }
            checks += 1;
            if checks % interval == 0 && cancelled() {
                return None;
            }
            if cb.are_items_the_same(old_item, &new[j]) {
                old_to_new[i] = Some(j);
                new_to_old[j] = Some(i);
                unmatched_new -= 1;
                hint = j + 1;
                break;
            }
        }
    }

    Some((old_to_new, new_to_old))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callback::{DisplayIdentity, KeyedCallback, item_callback};
    use crate::op::OpLog;

    #[derive(Clone, Debug, PartialEq)]
    struct Row {
        id: u32,
        v: &'static str,
    }

    fn r(id: u32, v: &'static str) -> Row {
        Row { id, v }
    }

    fn row_id(row: &Row) -> u32 {
        row.id
    }

    fn by_id() -> KeyedCallback<fn(&Row) -> u32, u32> {
        KeyedCallback::new(row_id as fn(&Row) -> u32)
    }

    fn diff(old: &[Row], new: &[Row]) -> DiffResult {
        calculate_diff(old, new, &by_id(), DiffOptions::default())
    }

    /// Replays the script on old ids, checking every step is in range, and
    /// returns the resulting ids plus the positions flagged as changed.
    fn replay(old: &[u32], new: &[u32], d: &DiffResult) -> (Vec<Option<u32>>, Vec<usize>) {
        let mut cur: Vec<Option<u32>> = old.iter().copied().map(Some).collect();
        let mut changed = Vec::new();
        for op in d.ops() {
            match *op {
                ListOp::Remove { position, count } => {
                    assert!(position + count <= cur.len(), "{op} out of range");
                    cur.drain(position..position + count);
                }
                ListOp::Insert { position, count } => {
                    assert!(position <= cur.len(), "{op} out of range");
                    for k in 0..count {
                        cur.insert(position + k, new.get(position + k).copied());
                    }
                }
                ListOp::Move { from, to } => {
                    assert!(from < cur.len() && to < cur.len(), "{op} out of range");
                    let x = cur.remove(from);
                    cur.insert(to, x);
                }
                ListOp::Change { position, count } => {
                    assert!(position + count <= cur.len(), "{op} out of range");
                    changed.extend(position..position + count);
                }
            }
        }
        (cur, changed)
    }

    fn ids(rows: &[Row]) -> Vec<u32> {
        rows.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_move_and_change() {
        let old = [r(1, "a"), r(2, "b")];
        let new = [r(2, "b"), r(1, "a2")];
        let d = diff(&old, &new);
        insta::assert_snapshot!(d.script(), @"mov(1,0) chg(1,1)");
        assert_eq!(d.moved(), 1);
        assert_eq!(d.changed(), 1);
        assert_eq!(d.inserted() + d.removed(), 0);
        assert_eq!(d.converted_old_position(0), Some(1));
        assert_eq!(d.converted_new_position(0), Some(1));
    }

    #[test]
    fn test_empty_to_one_and_back() {
        let one = [r(1, "a")];
        let d = diff(&[], &one);
        assert_eq!(d.ops(), &[ListOp::Insert { position: 0, count: 1 }]);

        let d = diff(&one, &[]);
        assert_eq!(d.ops(), &[ListOp::Remove { position: 0, count: 1 }]);
    }

    #[test]
    fn test_identical_lists_are_empty() {
        let rows = [r(1, "a"), r(2, "b"), r(3, "c")];
        let d = diff(&rows, &rows.clone());
        assert!(d.is_empty());
        assert_eq!(d.old_len(), 3);
        assert_eq!(d.new_len(), 3);
    }

    #[test]
    fn test_ranges_coalesce() {
        let old = [r(1, "a"), r(2, "b"), r(3, "c"), r(4, "d"), r(5, "e")];
        let new = [
            r(1, "a"),
            r(4, "D"),
            r(5, "E"),
            r(6, "f"),
            r(7, "g"),
        ];
        let d = diff(&old, &new);
        insta::assert_snapshot!(d.script(), @"rem(1,2) ins(3,2) chg(1,2)");
    }

    #[test]
    fn test_rotation_is_one_move() {
        let old = [r(1, ""), r(2, ""), r(3, ""), r(4, "")];
        let new = [r(2, ""), r(3, ""), r(4, ""), r(1, "")];
        let d = diff(&old, &new);
        assert_eq!(d.ops(), &[ListOp::Move { from: 0, to: 3 }]);
    }

    #[test]
    fn test_without_move_detection() {
        let old = [r(1, "a"), r(2, "b")];
        let new = [r(2, "b"), r(1, "a")];
        let opts = DiffOptions {
            detect_moves: false,
            ..DiffOptions::default()
        };
        let d = calculate_diff(&old, &new, &by_id(), opts);
        insta::assert_snapshot!(d.script(), @"rem(1,1) ins(0,1)");
        let (cur, _) = replay(&ids(&old), &ids(&new), &d);
        assert_eq!(cur, vec![Some(2), Some(1)]);
    }

    #[test]
    fn test_dispatch_matches_ops() {
        let old = [r(1, "a"), r(2, "b"), r(3, "c")];
        let new = [r(3, "c"), r(4, "d"), r(1, "x")];
        let d = diff(&old, &new);
        let mut log = OpLog::default();
        d.dispatch_updates_to(&mut log);
        assert_eq!(log.0.as_slice(), d.ops());
        assert_eq!(log.script(), d.script());
    }

    #[test]
    fn test_scripts_reach_the_new_list() {
        // Small deterministic LCG; each case is a shuffled mix of kept,
        // dropped and fresh ids with some content edits.
        let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
        let mut next = move |bound: u64| {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            ((seed >> 33) % bound) as usize
        };

        for _ in 0..200 {
            let old_len = next(12);
            let old: Vec<Row> = (0..old_len as u32).map(|id| r(id, "a")).collect();
            let mut new: Vec<Row> = Vec::new();
            for row in &old {
                if next(4) == 0 {
                    continue;
                }
                new.push(if next(3) == 0 { r(row.id, "b") } else { row.clone() });
            }
            for k in 0..next(4) {
                let at = next(new.len() as u64 + 1);
                new.insert(at, r(100 + k as u32, "n"));
            }
            for _ in 0..next(4) {
                if new.len() > 1 {
                    let a = next(new.len() as u64);
                    let b = next(new.len() as u64);
                    new.swap(a, b);
                }
            }

            let d = diff(&old, &new);
            let (cur, changed) = replay(&ids(&old), &ids(&new), &d);
            let expect: Vec<Option<u32>> = new.iter().map(|row| Some(row.id)).collect();
            assert_eq!(cur, expect, "script {} for {:?} -> {:?}", d.script(), ids(&old), ids(&new));

            let expect_changed: Vec<usize> = new
                .iter()
                .enumerate()
                .filter(|(_, row)| row.v == "b")
                .map(|(j, _)| j)
                .collect();
            assert_eq!(changed, expect_changed);

            // no remove/insert pair for an id present on both sides
            assert_eq!(d.removed(), old.len() - d.new_to_old.iter().flatten().count());
        }
    }

    #[test]
    fn test_inconsistent_identity_still_valid() {
        // "same" whenever ids share parity; not a real identity
        let cb = item_callback(|a: &Row, b: &Row| a.id % 2 == b.id % 2, |a: &Row, b: &Row| a == b);
        let old = [r(1, "a"), r(2, "b"), r(3, "c"), r(4, "d")];
        let new = [r(6, "x"), r(5, "y"), r(8, "z")];
        let d = calculate_diff(&old, &new, &cb, DiffOptions::default());
        let (cur, _) = replay(&ids(&old), &ids(&new), &d);
        assert_eq!(cur.len(), new.len());
    }

    #[test]
    fn test_display_identity() {
        let old = vec!["alpha".to_string(), "beta".to_string()];
        let new = vec!["beta".to_string(), "gamma".to_string()];
        let d = calculate_diff(&old, &new, &DisplayIdentity, DiffOptions::default());
        insta::assert_snapshot!(d.script(), @"rem(0,1) ins(1,1)");
    }

    #[test]
    fn test_cancelled_diff_returns_none() {
        let old: Vec<Row> = (0..100).map(|id| r(id, "a")).collect();
        let new: Vec<Row> = (0..100).rev().map(|id| r(id, "a")).collect();
        let opts = DiffOptions {
            cancel_check_interval: 1,
            ..DiffOptions::default()
        };
        assert!(calculate_diff_cancellable(&old, &new, &by_id(), opts, &|| true).is_none());
    }
}
