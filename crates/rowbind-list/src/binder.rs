use std::sync::Arc;
use std::time::Duration;

use rowbind_core::{BinderConfig, Signal, signal};
use rowbind_diff::{DiffOptions, ItemCallback, ListUpdateCallback};
use slotmap::{SlotMap, new_key_type};

use crate::differ::{AsyncDiffer, ListSubmitter, SharedCallback, Waker};
use crate::error::BinderError;
use crate::pool::{RecyclePool, ViewType};

new_key_type! {
    pub struct HolderKey;
}

pub type ViewFactory<V> = Box<dyn FnMut(ViewType) -> anyhow::Result<V>>;
pub type BindFn<T, V> = Box<dyn Fn(&T, &mut V, usize)>;

/// A created view and the row position it was last placed at.
pub struct RowHolder<V> {
    pub view: V,
    pub position: usize,
    pub view_type: ViewType,
}

#[derive(Clone, Copy, Debug)]
struct RowSlot {
    holder: Option<HolderKey>,
    // content changed (or never bound) since the holder was last bound
    stale: bool,
}

impl RowSlot {
    const EMPTY: RowSlot = RowSlot {
        holder: None,
        stale: true,
    };
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BindStats {
    pub views_created: u64,
    pub views_recycled: u64,
    pub binds: u64,
    pub diffs_applied: u64,
    pub diffs_discarded: u64,
}

/// Displays a list of `T` as views `V`, rebinding only rows whose identity or
/// content changed between submitted lists.
///
/// Lives on the display thread. Lists can be submitted from anywhere through
/// [`ListBinder::submitter`]; they are diffed on a background thread and
/// become visible on the next [`ListBinder::pump`].
pub struct ListBinder<T, V> {
    differ: AsyncDiffer<T>,
    items: Arc<Vec<T>>,
    rows: Vec<RowSlot>,
    holders: SlotMap<HolderKey, RowHolder<V>>,
    pool: RecyclePool<V>,
    view_factory: ViewFactory<V>,
    bind: BindFn<T, V>,
    view_type: Option<Box<dyn Fn(&T) -> ViewType>>,
    on_activated: Option<Box<dyn Fn(&T)>>,
    update_listener: Option<Box<dyn ListUpdateCallback>>,
    list_listener: Option<Box<dyn Fn(&[T], &[T])>>,
    commits: Vec<(u64, Box<dyn FnOnce()>)>,
    version: Signal<u64>,
    stats: BindStats,
}

pub struct ListBinderBuilder<T, V> {
    config: BinderConfig,
    callback: SharedCallback<T>,
    view_factory: ViewFactory<V>,
    bind: BindFn<T, V>,
    initial: Vec<T>,
    view_type: Option<Box<dyn Fn(&T) -> ViewType>>,
    on_activated: Option<Box<dyn Fn(&T)>>,
    update_listener: Option<Box<dyn ListUpdateCallback>>,
    list_listener: Option<Box<dyn Fn(&[T], &[T])>>,
    waker: Option<Waker>,
}

impl<T: Send + Sync + 'static, V> ListBinder<T, V> {
    pub fn builder(
        callback: impl ItemCallback<T> + Send + Sync + 'static,
        view_factory: impl FnMut(ViewType) -> anyhow::Result<V> + 'static,
        bind: impl Fn(&T, &mut V, usize) + 'static,
    ) -> ListBinderBuilder<T, V> {
        ListBinderBuilder {
            config: BinderConfig::default(),
            callback: Arc::new(callback),
            view_factory: Box::new(view_factory),
            bind: Box::new(bind),
            initial: Vec::new(),
            view_type: None,
            on_activated: None,
            update_listener: None,
            list_listener: None,
            waker: None,
        }
    }
}

impl<T: Send + Sync + 'static, V> ListBinderBuilder<T, V> {
    pub fn config(mut self, config: BinderConfig) -> Self {
        self.config = config;
        self
    }

    /// Shown immediately, without a diff.
    pub fn initial_list(mut self, items: Vec<T>) -> Self {
        self.initial = items;
        self
    }

    pub fn view_type(mut self, f: impl Fn(&T) -> ViewType + 'static) -> Self {
        self.view_type = Some(Box::new(f));
        self
    }

    pub fn on_row_activated(mut self, f: impl Fn(&T) + 'static) -> Self {
        self.on_activated = Some(Box::new(f));
        self
    }

    /// Receives every applied edit script, e.g. to animate rows.
    pub fn on_list_update(mut self, l: impl ListUpdateCallback + 'static) -> Self {
        self.update_listener = Some(Box::new(l));
        self
    }

    /// Called with `(previous, current)` after each applied list.
    pub fn on_current_list_changed(mut self, f: impl Fn(&[T], &[T]) + 'static) -> Self {
        self.list_listener = Some(Box::new(f));
        self
    }

    /// Called from the diff thread when a result is ready to `pump`.
    pub fn on_result_ready(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.waker = Some(Arc::new(f));
        self
    }

    pub fn build(self) -> Result<ListBinder<T, V>, BinderError> {
        let opts = DiffOptions {
            detect_moves: self.config.detect_moves,
            cancel_check_interval: self.config.cancel_check_interval,
        };
        let items = Arc::new(self.initial);
        let differ = AsyncDiffer::spawn(
            items.clone(),
            self.callback,
            opts,
            &self.config.worker_name,
            self.waker,
        )?;

        Ok(ListBinder {
            differ,
            rows: vec![RowSlot::EMPTY; items.len()],
            items,
            holders: SlotMap::with_key(),
            pool: RecyclePool::new(self.config.max_recycled_per_type),
            view_factory: self.view_factory,
            bind: self.bind,
            view_type: self.view_type,
            on_activated: self.on_activated,
            update_listener: self.update_listener,
            list_listener: self.list_listener,
            commits: Vec::new(),
            version: signal(0),
            stats: BindStats::default(),
        })
    }
}

impl<T, V> ListBinder<T, V> {
    /// Replaces the displayed list once the diff has run and [`pump`] applied it.
    ///
    /// [`pump`]: ListBinder::pump
    pub fn submit_list(&mut self, items: Vec<T>) -> Result<u64, BinderError> {
        self.differ.submitter().submit(items)
    }

    /// Like [`ListBinder::submit_list`]; `commit` runs right after this list
    /// is applied, and is dropped unrun if a newer list supersedes it.
    pub fn submit_list_with_commit(
        &mut self,
        items: Vec<T>,
        commit: impl FnOnce() + 'static,
    ) -> Result<u64, BinderError> {
        let seq = self.submit_list(items)?;
        self.commits.push((seq, Box::new(commit)));
        Ok(seq)
    }

    pub fn submitter(&self) -> ListSubmitter<T> {
        self.differ.submitter()
    }

    /// Applies the newest finished diff, if any. Returns whether the
    /// displayed list changed.
    pub fn pump(&mut self) -> bool {
        let Some(ready) = self.differ.take_ready() else {
            return false;
        };

        {
            let mut table = RowTable {
                rows: &mut self.rows,
                holders: &mut self.holders,
                pool: &mut self.pool,
            };
            ready.diff.dispatch_updates_to(&mut table);
        }
        if let Some(l) = self.update_listener.as_mut() {
            let mut l: &mut dyn ListUpdateCallback = l.as_mut();
            ready.diff.dispatch_updates_to(&mut l);
        }

        if self.rows.len() != ready.list.len() {
            log::warn!(
                "diff #{} left {} rows for {} items; rebinding all rows",
                ready.seq,
                self.rows.len(),
                ready.list.len()
            );
            self.reset_rows(ready.list.len());
        }
        for (position, slot) in self.rows.iter().enumerate() {
            if let Some(h) = slot.holder.and_then(|k| self.holders.get_mut(k)) {
                h.position = position;
            }
        }

        let previous = std::mem::replace(&mut self.items, ready.list);
        self.stats.diffs_applied += 1;
        log::debug!(
            "applied diff #{} ({} -> {} rows) in {:?}: {}",
            ready.seq,
            previous.len(),
            self.items.len(),
            ready.elapsed,
            ready.diff.script()
        );

        // Commits for older submissions were superseded.
        let commits = std::mem::take(&mut self.commits);
        for (seq, commit) in commits {
            if seq == ready.seq {
                commit();
            } else if seq > ready.seq {
                self.commits.push((seq, commit));
            }
        }

        if let Some(f) = &self.list_listener {
            f(&previous, &self.items);
        }
        self.version.update(|v| *v += 1);
        true
    }

    /// Blocks until the diff thread has nothing queued or running.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        self.differ.wait_idle(timeout)
    }

    pub fn is_idle(&self) -> bool {
        self.differ.is_idle()
    }

    /// The view for the row at `position`, created and bound if needed.
    ///
    /// The bind function runs only when the row has no view yet or its
    /// content changed since the last bind.
    pub fn bind_row(&mut self, position: usize) -> Result<&V, BinderError> {
        let len = self.items.len();
        let Some(slot) = self.rows.get(position).copied() else {
            return Err(BinderError::PositionOutOfBounds { position, len });
        };
        let item = &self.items[position];
        let view_type = self.view_type.as_ref().map_or(0, |f| f(item));

        let key = match slot.holder {
            Some(key) if self.holders.get(key).is_some_and(|h| h.view_type == view_type) => {
                if slot.stale {
                    let holder = &mut self.holders[key];
                    (self.bind)(item, &mut holder.view, position);
                    self.stats.binds += 1;
                }
                key
            }
            other => {
                if let Some(old) = other.and_then(|k| self.holders.remove(k)) {
                    self.pool.put(old.view_type, old.view);
                }
                let mut view = match self.pool.take(view_type) {
                    Some(v) => {
                        self.stats.views_recycled += 1;
                        v
                    }
                    None => {
                        let v = (self.view_factory)(view_type).map_err(BinderError::ViewFactory)?;
                        self.stats.views_created += 1;
                        v
                    }
                };
                (self.bind)(item, &mut view, position);
                self.stats.binds += 1;
                self.holders.insert(RowHolder {
                    view,
                    position,
                    view_type,
                })
            }
        };

        self.rows[position] = RowSlot {
            holder: Some(key),
            stale: false,
        };
        let holder = &mut self.holders[key];
        holder.position = position;
        Ok(&holder.view)
    }

    /// Forwards the item at `position` to the activation callback. No-op
    /// without a callback or for a position past the end.
    pub fn on_row_activated(&self, position: usize) {
        if let (Some(cb), Some(item)) = (&self.on_activated, self.items.get(position)) {
            cb(item);
        }
    }

    /// The view currently held for `position`, without binding.
    pub fn view_at(&self, position: usize) -> Option<&V> {
        let key = self.rows.get(position)?.holder?;
        self.holders.get(key).map(|h| &h.view)
    }

    pub fn holder_at(&self, position: usize) -> Option<&RowHolder<V>> {
        let key = self.rows.get(position)?.holder?;
        self.holders.get(key)
    }

    pub fn current_list(&self) -> &Arc<Vec<T>> {
        &self.items
    }

    pub fn item(&self, position: usize) -> Option<&T> {
        self.items.get(position)
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Bumped on every applied list.
    pub fn version(&self) -> Signal<u64> {
        self.version.clone()
    }

    pub fn stats(&self) -> BindStats {
        BindStats {
            diffs_discarded: self.differ.discarded(),
            ..self.stats
        }
    }

    pub fn recycled_views(&self) -> usize {
        self.pool.total()
    }

    fn reset_rows(&mut self, len: usize) {
        for (_, h) in self.holders.drain() {
            self.pool.put(h.view_type, h.view);
        }
        self.rows = vec![RowSlot::EMPTY; len];
    }
}

/// Applies edit-script steps to the row slots.
struct RowTable<'a, V> {
    rows: &'a mut Vec<RowSlot>,
    holders: &'a mut SlotMap<HolderKey, RowHolder<V>>,
    pool: &'a mut RecyclePool<V>,
}

impl<V> ListUpdateCallback for RowTable<'_, V> {
    fn on_inserted(&mut self, position: usize, count: usize) {
        let at = position.min(self.rows.len());
        self.rows
            .splice(at..at, std::iter::repeat_n(RowSlot::EMPTY, count));
    }

    fn on_removed(&mut self, position: usize, count: usize) {
        let start = position.min(self.rows.len());
        let end = (position + count).min(self.rows.len());
        for slot in self.rows.drain(start..end) {
            if let Some(h) = slot.holder.and_then(|k| self.holders.remove(k)) {
                self.pool.put(h.view_type, h.view);
            }
        }
    }

    fn on_moved(&mut self, from: usize, to: usize) {
        if from < self.rows.len() && to < self.rows.len() {
            let slot = self.rows.remove(from);
            self.rows.insert(to, slot);
        }
    }

    fn on_changed(&mut self, position: usize, count: usize) {
        let end = (position + count).min(self.rows.len());
        for slot in self.rows.iter_mut().take(end).skip(position) {
            slot.stale = true;
        }
    }
}
