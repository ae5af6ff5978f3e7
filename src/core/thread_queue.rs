//! Blocking work queue bound to one dedicated worker thread
//!
//! Any number of producer threads push items; a single worker thread executes
//! them in the order the queue lock admitted them. [`ThreadQueue::exit`] drains
//! everything already queued before it returns.

use super::{
    error::{QueueError, Result},
    metrics::QueueMetrics,
    overflow_policy::OverflowPolicy,
    work_item::WorkItem,
};
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::marker::PhantomData;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle, ThreadId};
use std::time::Instant;

/// Default worker thread name
pub const DEFAULT_QUEUE_NAME: &str = "output-queue";

/// Callback receiving failures that happen on the worker thread
///
/// Called with the queue name and the error. Failures are never propagated
/// to producers; this is the only place they surface.
pub type FailureReporter = Arc<dyn Fn(&str, &QueueError) + Send + Sync>;

/// Default reporter: one line on the platform debug channel
pub fn default_reporter() -> FailureReporter {
    Arc::new(|queue, error| {
        let _ = crate::sinks::debug::emit(&format!("[QUEUE ERROR] {}: {}\n", queue, error));
    })
}

struct State<W> {
    items: VecDeque<W>,
    exit_requested: bool,
    stopped: bool,
}

impl<W> State<W> {
    fn is_open(&self) -> bool {
        !self.exit_requested && !self.stopped
    }

    fn is_full(&self, max: usize) -> bool {
        self.is_open() && self.items.len() >= max
    }
}

struct Shared<W> {
    state: Mutex<State<W>>,
    /// Signals the worker: items available or exit requested
    ready: Condvar,
    /// Signals producers blocked on a full bounded queue
    space: Condvar,
    metrics: QueueMetrics,
    capacity: Option<usize>,
    overflow_policy: OverflowPolicy,
    name: String,
    reporter: FailureReporter,
}

impl<W> Shared<W> {
    fn report(&self, error: &QueueError) {
        // A panicking reporter must not take the worker down with it.
        let _ = panic::catch_unwind(AssertUnwindSafe(|| (self.reporter)(&self.name, error)));
    }

    fn run<T>(&self, target: &mut T)
    where
        W: WorkItem<T>,
    {
        loop {
            let next = {
                let mut state = self.state.lock();
                loop {
                    if let Some(item) = state.items.pop_front() {
                        break Some(item);
                    }
                    if state.exit_requested {
                        break None;
                    }
                    self.ready.wait(&mut state);
                }
            };

            match next {
                Some(item) => {
                    if self.capacity.is_some() {
                        self.space.notify_one();
                    }
                    self.execute(item, target);
                }
                None => break,
            }
        }

        match panic::catch_unwind(AssertUnwindSafe(|| W::finish(target))) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => self.report(&e),
            Err(payload) => self.report(&QueueError::from_panic(payload.as_ref(), true)),
        }
    }

    /// Execute one item outside the lock, containing any failure
    fn execute<T>(&self, item: W, target: &mut T)
    where
        W: WorkItem<T>,
    {
        match panic::catch_unwind(AssertUnwindSafe(|| item.execute(target))) {
            Ok(Ok(())) => {
                self.metrics.record_executed();
            }
            Ok(Err(e)) => {
                self.metrics.record_failed();
                self.report(&e);
            }
            Err(payload) => {
                self.metrics.record_failed();
                self.report(&QueueError::from_panic(payload.as_ref(), false));
            }
        }
    }
}

/// Marks the queue stopped when the worker leaves, however it leaves
struct StopGuard<'a, W>(&'a Shared<W>);

impl<W> Drop for StopGuard<'_, W> {
    fn drop(&mut self) {
        self.0.state.lock().stopped = true;
        self.0.space.notify_all();
    }
}

/// An ordered, lock-protected queue of work items plus its worker thread.
///
/// `W` is the item type and `T` the target the worker owns and passes to each
/// item (see [`WorkItem`]). The target moves to the worker thread at spawn and
/// is dropped there when the worker finishes, before [`exit`](Self::exit)
/// returns.
///
/// Ordering is lock-fair, not wall-clock-fair: items from one producer run in
/// the order that producer pushed them; items from different producers run in
/// whatever total order the lock admitted them.
///
/// # Example
///
/// ```
/// use serial_output::{Result, ThreadQueue, WorkItem};
///
/// struct Append(&'static str);
///
/// impl WorkItem<Vec<&'static str>> for Append {
///     fn execute(self, out: &mut Vec<&'static str>) -> Result<()> {
///         out.push(self.0);
///         Ok(())
///     }
/// }
///
/// let queue = ThreadQueue::spawn(Vec::new()).unwrap();
/// queue.push(Append("first")).unwrap();
/// queue.push(Append("second")).unwrap();
/// queue.exit();
/// assert!(!queue.is_running());
/// ```
pub struct ThreadQueue<W, T> {
    shared: Arc<Shared<W>>,
    worker: Mutex<Option<JoinHandle<()>>>,
    thread_id: ThreadId,
    _target: PhantomData<fn(T)>,
}

impl<W, T> ThreadQueue<W, T>
where
    W: WorkItem<T>,
    T: Send + 'static,
{
    /// Spawn an unbounded queue with default settings
    pub fn spawn(target: T) -> Result<Self> {
        QueueBuilder::new().spawn(target)
    }

    fn spawn_with(builder: QueueBuilder, mut target: T) -> Result<Self> {
        let shared = Arc::new(Shared {
            state: Mutex::new(State {
                items: VecDeque::new(),
                exit_requested: false,
                stopped: false,
            }),
            ready: Condvar::new(),
            space: Condvar::new(),
            metrics: QueueMetrics::new(),
            capacity: builder.capacity,
            overflow_policy: builder.overflow_policy,
            name: builder.name,
            reporter: builder.reporter.unwrap_or_else(default_reporter),
        });

        let worker_shared = Arc::clone(&shared);
        let handle = thread::Builder::new()
            .name(shared.name.clone())
            .spawn(move || {
                let shared = &*worker_shared;
                let _guard = StopGuard(shared);
                let result = panic::catch_unwind(AssertUnwindSafe(|| shared.run(&mut target)));
                if let Err(payload) = result {
                    shared.report(&QueueError::from_panic(payload.as_ref(), true));
                }
            })
            .map_err(QueueError::Spawn)?;

        Ok(Self {
            thread_id: handle.thread().id(),
            shared,
            worker: Mutex::new(Some(handle)),
            _target: PhantomData,
        })
    }

    /// Append an item to the tail of the queue and wake the worker.
    ///
    /// Never waits on the sink. On a bounded queue that is full, the
    /// configured [`OverflowPolicy`] applies.
    ///
    /// # Errors
    ///
    /// - [`QueueError::QueueStopped`] after [`exit`](Self::exit) was called or
    ///   the worker died; the item is dropped unexecuted.
    /// - [`QueueError::QueueFull`] when a bounded queue stays full.
    pub fn push(&self, item: W) -> Result<()> {
        let shared = &*self.shared;
        let mut state = shared.state.lock();

        if let Some(max) = shared.capacity {
            // The worker pushing into its own full queue would wait forever.
            let may_block = thread::current().id() != self.thread_id;

            if may_block && shared.overflow_policy != OverflowPolicy::Reject && state.is_full(max)
            {
                // A timeout past the representable range waits like Block.
                let deadline = match shared.overflow_policy {
                    OverflowPolicy::BlockWithTimeout(timeout) => Instant::now().checked_add(timeout),
                    _ => None,
                };
                while state.is_full(max) {
                    match deadline {
                        Some(deadline) => {
                            if shared.space.wait_until(&mut state, deadline).timed_out() {
                                break;
                            }
                        }
                        None => shared.space.wait(&mut state),
                    }
                }
            }

            if state.is_full(max) {
                let current = state.items.len();
                drop(state);
                shared.metrics.record_rejected();
                return Err(QueueError::queue_full(current, max));
            }
        }

        if !state.is_open() {
            drop(state);
            shared.metrics.record_rejected();
            return Err(QueueError::QueueStopped);
        }

        state.items.push_back(item);
        shared.metrics.record_pushed();
        drop(state);

        shared.ready.notify_one();
        Ok(())
    }
}

impl<W, T> ThreadQueue<W, T> {
    /// Request shutdown and block until the worker has drained the queue
    /// and stopped.
    ///
    /// Everything pushed before this call is executed before it returns.
    /// Repeated calls are no-ops; a concurrent second caller waits for the
    /// first to finish. Called from the worker thread itself, it only
    /// requests the exit, since the worker cannot wait for itself.
    pub fn exit(&self) {
        self.shared.state.lock().exit_requested = true;
        self.shared.ready.notify_one();
        self.shared.space.notify_all();

        if thread::current().id() == self.thread_id {
            return;
        }

        let mut worker = self.worker.lock();
        if let Some(handle) = worker.take() {
            if let Err(payload) = handle.join() {
                self.shared
                    .report(&QueueError::from_panic(payload.as_ref(), true));
            }
        }
    }

    /// Number of items waiting to be executed
    ///
    /// After the worker died, the items it left behind remain here.
    pub fn len(&self) -> usize {
        self.shared.state.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the worker still accepts and executes items
    pub fn is_running(&self) -> bool {
        self.shared.state.lock().is_open()
    }

    /// Identifier of the dedicated worker thread
    pub fn thread_id(&self) -> ThreadId {
        self.thread_id
    }

    /// Queue name, also used as the worker thread name
    pub fn name(&self) -> &str {
        &self.shared.name
    }

    pub fn capacity(&self) -> Option<usize> {
        self.shared.capacity
    }

    pub fn metrics(&self) -> &QueueMetrics {
        &self.shared.metrics
    }
}

impl<W, T> Drop for ThreadQueue<W, T> {
    fn drop(&mut self) {
        self.exit();
    }
}

/// Builder for [`ThreadQueue`]
///
/// # Example
///
/// ```
/// use serial_output::{OverflowPolicy, QueueBuilder, Result, ThreadQueue, WorkItem};
/// use std::sync::Arc;
///
/// struct Count;
///
/// impl WorkItem<u32> for Count {
///     fn execute(self, n: &mut u32) -> Result<()> {
///         *n += 1;
///         Ok(())
///     }
/// }
///
/// let queue: ThreadQueue<Count, u32> = QueueBuilder::new()
///     .name("counter")
///     .capacity(64)
///     .overflow_policy(OverflowPolicy::Block)
///     .on_failure(Arc::new(|queue, err| eprintln!("{}: {}", queue, err)))
///     .spawn(0)
///     .unwrap();
/// queue.push(Count).unwrap();
/// ```
pub struct QueueBuilder {
    name: String,
    capacity: Option<usize>,
    overflow_policy: OverflowPolicy,
    reporter: Option<FailureReporter>,
}

impl QueueBuilder {
    pub fn new() -> Self {
        Self {
            name: DEFAULT_QUEUE_NAME.to_string(),
            capacity: None,
            overflow_policy: OverflowPolicy::default(),
            reporter: None,
        }
    }

    /// Set the queue name (worker thread name)
    #[must_use = "builder methods return a new value"]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Bound the queue. Unbounded when never called.
    #[must_use = "builder methods return a new value"]
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn maybe_capacity(mut self, capacity: Option<usize>) -> Self {
        self.capacity = capacity;
        self
    }

    /// What `push` does when a bounded queue is full
    #[must_use = "builder methods return a new value"]
    pub fn overflow_policy(mut self, policy: OverflowPolicy) -> Self {
        self.overflow_policy = policy;
        self
    }

    /// Replace the default failure reporter
    #[must_use = "builder methods return a new value"]
    pub fn on_failure(mut self, reporter: FailureReporter) -> Self {
        self.reporter = Some(reporter);
        self
    }

    fn validate(&self) -> Result<()> {
        if self.capacity == Some(0) {
            return Err(QueueError::config("QueueBuilder", "capacity must be non-zero"));
        }
        if self.name.contains('\0') {
            return Err(QueueError::config("QueueBuilder", "name must not contain NUL"));
        }
        Ok(())
    }

    /// Create the queue and start its worker thread
    pub fn spawn<W, T>(self, target: T) -> Result<ThreadQueue<W, T>>
    where
        W: WorkItem<T>,
        T: Send + 'static,
    {
        self.validate()?;
        ThreadQueue::spawn_with(self, target)
    }
}

impl Default for QueueBuilder {
    fn default() -> Self {
        Self::new()
    }
}
