//! Background diffing with a single pending slot.
//!
//! Submissions get increasing sequence numbers. The worker only ever diffs
//! the newest pending list against the displayed one, abandons a diff as
//! soon as a newer submission arrives, and publishes into a single ready
//! slot. The display thread takes from that slot in [`AsyncDiffer::take_ready`].

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;

use parking_lot::{Condvar, Mutex};
use rowbind_diff::{DiffOptions, DiffResult, ItemCallback, calculate_diff_cancellable};
use web_time::Instant;

use crate::error::BinderError;

pub type Waker = Arc<dyn Fn() + Send + Sync>;
pub(crate) type SharedCallback<T> = Arc<dyn ItemCallback<T> + Send + Sync>;

struct Job<T> {
    seq: u64,
    list: Arc<Vec<T>>,
}

pub(crate) struct Ready<T> {
    pub seq: u64,
    pub base: Arc<Vec<T>>,
    pub list: Arc<Vec<T>>,
    pub diff: DiffResult,
    pub elapsed: Duration,
}

struct State<T> {
    latest_seq: u64,
    displayed: Arc<Vec<T>>,
    pending: Option<Job<T>>,
    ready: Option<Ready<T>>,
    busy: bool,
    stopped: bool,
}

struct Shared<T> {
    state: Mutex<State<T>>,
    changed: Condvar,
    // Mirrors `State::latest_seq` so the worker can poll it without the lock.
    latest: AtomicU64,
    discarded: AtomicU64,
    waker: Option<Waker>,
}

impl<T> Shared<T> {
    fn discard(&self, seq: u64, why: &str) {
        self.discarded.fetch_add(1, Ordering::Relaxed);
        log::debug!("dropping diff #{seq}: {why}");
    }
}

/// Cloneable handle for submitting lists from any thread.
pub struct ListSubmitter<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for ListSubmitter<T> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<T> ListSubmitter<T> {
    /// Queues `list` to replace whatever is displayed or pending. Returns the
    /// submission's sequence number.
    pub fn submit(&self, list: Vec<T>) -> Result<u64, BinderError> {
        let mut st = self.shared.state.lock();
        if st.stopped {
            return Err(BinderError::WorkerGone);
        }
        st.latest_seq += 1;
        let seq = st.latest_seq;
        self.shared.latest.store(seq, Ordering::Release);

        if let Some(old) = st.pending.replace(Job {
            seq,
            list: Arc::new(list),
        }) {
            self.shared.discard(old.seq, "superseded before diffing");
        }
        if let Some(old) = st.ready.take() {
            self.shared.discard(old.seq, "superseded before apply");
        }
        self.shared.changed.notify_all();
        Ok(seq)
    }
}

pub(crate) struct AsyncDiffer<T> {
    shared: Arc<Shared<T>>,
    worker: Option<JoinHandle<()>>,
}

impl<T: Send + Sync + 'static> AsyncDiffer<T> {
    pub fn spawn(
        initial: Arc<Vec<T>>,
        callback: SharedCallback<T>,
        opts: DiffOptions,
        worker_name: &str,
        waker: Option<Waker>,
    ) -> Result<Self, BinderError> {
        let shared = Arc::new(Shared {
            state: Mutex::new(State {
                latest_seq: 0,
                displayed: initial,
                pending: None,
                ready: None,
                busy: false,
                stopped: false,
            }),
            changed: Condvar::new(),
            latest: AtomicU64::new(0),
            discarded: AtomicU64::new(0),
            waker,
        });

        let worker = {
            let shared = shared.clone();
            std::thread::Builder::new()
                .name(worker_name.to_string())
                .spawn(move || run_worker(shared, callback, opts))
                .map_err(BinderError::WorkerSpawn)?
        };

        Ok(Self {
            shared,
            worker: Some(worker),
        })
    }
}

impl<T> AsyncDiffer<T> {
    pub fn submitter(&self) -> ListSubmitter<T> {
        ListSubmitter {
            shared: self.shared.clone(),
        }
    }

    pub fn discarded(&self) -> u64 {
        self.shared.discarded.load(Ordering::Relaxed)
    }

    /// Takes the ready diff if it is still the newest submission and was
    /// computed against the displayed list. On success the displayed list is
    /// swapped before the lock is released.
    pub fn take_ready(&self) -> Option<Ready<T>> {
        let mut st = self.shared.state.lock();
        let ready = st.ready.take()?;
        if ready.seq != st.latest_seq {
            self.shared.discard(ready.seq, "stale at apply");
            return None;
        }
        if !Arc::ptr_eq(&ready.base, &st.displayed) {
            // Computed against a list that is no longer shown; run it again.
            if st.pending.is_none() {
                st.pending = Some(Job {
                    seq: ready.seq,
                    list: ready.list,
                });
                self.shared.changed.notify_all();
            }
            log::debug!("diff #{} had an outdated base, requeued", ready.seq);
            return None;
        }
        st.displayed = ready.list.clone();
        Some(ready)
    }

    /// Blocks until nothing is queued or running, or `timeout` passes.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut st = self.shared.state.lock();
        loop {
            if (st.pending.is_none() && !st.busy) || st.stopped {
                return true;
            }
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            self.shared.changed.wait_for(&mut st, deadline - now);
        }
    }

    pub fn is_idle(&self) -> bool {
        let st = self.shared.state.lock();
        st.pending.is_none() && !st.busy
    }
}

impl<T> Drop for AsyncDiffer<T> {
    fn drop(&mut self) {
        {
            let mut st = self.shared.state.lock();
            st.stopped = true;
            self.shared.latest.store(u64::MAX, Ordering::Release);
            self.shared.changed.notify_all();
        }
        if let Some(handle) = self.worker.take()
            && handle.join().is_err()
        {
            log::error!("diff worker panicked");
        }
    }
}

/// Marks the differ stopped however the worker exits, so submitters and
/// waiters don't hang on a dead thread.
struct StopGuard<T>(Arc<Shared<T>>);

impl<T> Drop for StopGuard<T> {
    fn drop(&mut self) {
        let mut st = self.0.state.lock();
        st.stopped = true;
        st.busy = false;
        self.0.changed.notify_all();
    }
}

fn run_worker<T>(shared: Arc<Shared<T>>, callback: SharedCallback<T>, opts: DiffOptions) {
    let _guard = StopGuard(shared.clone());
    log::debug!("diff worker started");

    loop {
        let (job, base) = {
            let mut st = shared.state.lock();
            loop {
                if st.stopped {
                    log::debug!("diff worker stopping");
                    return;
                }
                if let Some(job) = st.pending.take() {
                    st.busy = true;
                    let base = st.displayed.clone();
                    break (job, base);
                }
                shared.changed.wait(&mut st);
            }
        };

        let started = Instant::now();
        let cancelled = || shared.latest.load(Ordering::Acquire) != job.seq;
        let diff = calculate_diff_cancellable(&base[..], &job.list[..], &*callback, opts, &cancelled);
        let elapsed = started.elapsed();

        // Still busy until the waker has run, so `wait_idle` covers it.
        let publish = {
            let mut st = shared.state.lock();
            match diff {
                Some(diff) if st.latest_seq == job.seq && !st.stopped => {
                    log::trace!(
                        "diff #{} ready: {} steps in {:?}",
                        job.seq,
                        diff.ops().len(),
                        elapsed
                    );
                    st.ready = Some(Ready {
                        seq: job.seq,
                        base,
                        list: job.list,
                        diff,
                        elapsed,
                    });
                    true
                }
                _ => {
                    shared.discard(job.seq, "superseded while diffing");
                    false
                }
            }
        };

        if publish && let Some(w) = &shared.waker {
            w();
        }

        let mut st = shared.state.lock();
        st.busy = false;
        shared.changed.notify_all();
    }
}
