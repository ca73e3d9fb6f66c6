use std::collections::HashMap;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::thread::{self, ThreadId};

use oneshot::{Receiver, Sender};
use parking_lot::{Mutex, MutexGuard};
use tracing::{debug, trace};

use crate::container::injector::{CallContext, InjectorError};
use crate::container::Object;

/// The identity of one memoization cell.
///
/// Every call to [`singleton`] creates a fresh token, so two separately
/// wrapped bindings never share a cell even when bound under the same name.
///
/// [`singleton`]: crate::binding::singleton
#[derive(Clone)]
pub struct MemoToken(Arc<()>);

impl MemoToken {
    pub fn new() -> Self {
        Self(Arc::new(()))
    }
}

impl PartialEq for MemoToken {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for MemoToken {}

impl Hash for MemoToken {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.0).hash(state);
    }
}

impl Debug for MemoToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_tuple("MemoToken")
            .field(&Arc::as_ptr(&self.0))
            .finish()
    }
}

/// The memoization side-table owned by one container.
///
/// Values stored here live as long as the container. Concurrent first
/// requests for the same cell are deduplicated: one thread constructs the
/// value while the others wait for its outcome. A thread never waits on a
/// construction that is itself waiting on that thread.
pub struct Context {
    memo: Mutex<MemoData>,
}

impl Context {
    pub fn new() -> Self {
        Self {
            memo: Mutex::new(MemoData::new()),
        }
    }

    /// Returns the value memoized under `token`, calling `init` to produce it
    /// on first use.
    ///
    /// # Errors
    ///
    /// Returns [`InjectorError::CyclicDependency`] if the current thread is
    /// already constructing the value, directly or by waiting on other
    /// threads, or whatever `init` fails with. Failed constructions are not
    /// memoized.
    pub fn memoize<F>(
        &self,
        token: &MemoToken,
        context: &CallContext<'_>,
        init: F,
    ) -> Result<Object, InjectorError>
    where
        F: FnOnce() -> Result<Object, InjectorError>,
    {
        let memo = self.memo.lock();

        if let Some(object) = memo.objects.get(token) {
            trace!(target: "bindery", name = context.name(), "memoized object reused");
            return Ok(Arc::clone(object));
        }

        let on_current_thread = memo
            .constructing
            .get(token)
            .map(ConstructingObjectContext::is_constructed_by_current_thread);

        match on_current_thread {
            Some(true) => Err(Self::cyclic_dependency(context, false)),
            Some(false) if memo.waits_on_current_thread(token) => {
                Err(Self::cyclic_dependency(context, true))
            }
            Some(false) => self.wait_for_constructed_object(memo, token, context),
            None => self.construct_object(memo, token, init),
        }
    }

    /// Number of memoized values.
    pub fn len(&self) -> usize {
        self.memo.lock().objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The cell stays owned by the outer construction, which notifies its
    /// waiters once it finishes.
    fn cyclic_dependency(context: &CallContext<'_>, across_threads: bool) -> InjectorError {
        let chain = context.trace().chain();
        debug!(target: "bindery", %chain, across_threads, "circular dependency through a memoized binding");
        InjectorError::CyclicDependency { chain }
    }

    fn wait_for_constructed_object(
        &self,
        mut memo: MutexGuard<'_, MemoData>,
        token: &MemoToken,
        context: &CallContext<'_>,
    ) -> Result<Object, InjectorError> {
        let (sender, receiver) = oneshot::channel();
        let on_thread = thread::current().id();
        let Some(cell) = memo.constructing.get_mut(token) else {
            unreachable!("whether `cell` exists should be checked before calling this method")
        };
        cell.register_waiter(on_thread, sender);
        memo.waiting.insert(on_thread, token.clone());
        drop(memo);

        trace!(target: "bindery", name = context.name(), "waiting for another thread to construct");
        self.get_object_on_response(receiver, context)
    }

    fn get_object_on_response(
        &self,
        receiver: Receiver<WaitResponse>,
        context: &CallContext<'_>,
    ) -> Result<Object, InjectorError> {
        match receiver.recv() {
            Ok(WaitResponse::Constructed(object)) => Ok(object),
            Ok(WaitResponse::Error(err)) => Err(err),
            Err(_) => Err(InjectorError::construction(
                context.name(),
                "the thread constructing this object did not finish",
            )),
        }
    }

    fn construct_object<F>(
        &self,
        mut memo: MutexGuard<'_, MemoData>,
        token: &MemoToken,
        init: F,
    ) -> Result<Object, InjectorError>
    where
        F: FnOnce() -> Result<Object, InjectorError>,
    {
        let on_thread = thread::current().id();
        memo.constructing
            .insert(token.clone(), ConstructingObjectContext::new(on_thread));
        drop(memo);

        let mut pending = PendingConstruction::new(self, token);
        let res = init();
        pending.finish();

        let mut memo = self.memo.lock();
        match res {
            Ok(object) => {
                memo.objects.insert(token.clone(), Arc::clone(&object));
                self.notify_waiters(memo, token, WaitResponse::Constructed(Arc::clone(&object)));
                Ok(object)
            }
            Err(err) => {
                self.notify_waiters(memo, token, WaitResponse::Error(err.clone()));
                Err(err)
            }
        }
    }

    fn notify_waiters(
        &self,
        mut memo: MutexGuard<'_, MemoData>,
        token: &MemoToken,
        response: WaitResponse,
    ) {
        if let Some(cell) = memo.take_cell(token) {
            drop(memo);
            cell.notify(response);
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for Context {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Context")
            .field("memoized", &self.len())
            .finish_non_exhaustive()
    }
}

struct MemoData {
    objects: HashMap<MemoToken, Object>,
    constructing: HashMap<MemoToken, ConstructingObjectContext>,
    /// The cell each blocked thread is waiting on.
    waiting: HashMap<ThreadId, MemoToken>,
}

impl MemoData {
    fn new() -> Self {
        Self {
            objects: HashMap::new(),
            constructing: HashMap::new(),
            waiting: HashMap::new(),
        }
    }

    /// Follows the chain of constructing threads and the cells they wait on,
    /// starting from the owner of `token`, and reports whether it leads back
    /// to the current thread.
    fn waits_on_current_thread(&self, token: &MemoToken) -> bool {
        let current = thread::current().id();
        let mut token = token;
        for _ in 0..=self.waiting.len() {
            let Some(cell) = self.constructing.get(token) else {
                return false;
            };
            if cell.on_thread == current {
                return true;
            }
            match self.waiting.get(&cell.on_thread) {
                Some(awaited) => token = awaited,
                None => return false,
            }
        }
        false
    }

    /// Removes the cell of `token` and forgets that its waiters are blocked.
    fn take_cell(&mut self, token: &MemoToken) -> Option<ConstructingObjectContext> {
        let cell = self.constructing.remove(token)?;
        for (thread, _) in &cell.waiters {
            self.waiting.remove(thread);
        }
        Some(cell)
    }
}

struct ConstructingObjectContext {
    on_thread: ThreadId,
    waiters: Vec<(ThreadId, Sender<WaitResponse>)>,
}

impl ConstructingObjectContext {
    fn new(on_thread: ThreadId) -> Self {
        Self {
            on_thread,
            waiters: Vec::new(),
        }
    }

    fn is_constructed_by_current_thread(&self) -> bool {
        thread::current().id() == self.on_thread
    }

    fn register_waiter(&mut self, on_thread: ThreadId, sender: Sender<WaitResponse>) {
        self.waiters.push((on_thread, sender));
    }

    fn notify(self, response: WaitResponse) {
        for (_, sender) in self.waiters {
            let _ = sender.send(response.clone());
        }
    }
}

#[derive(Clone)]
enum WaitResponse {
    Constructed(Object),
    Error(InjectorError),
}

/// Drops the waiters of a construction that unwinds, so that they observe a
/// disconnected channel instead of blocking forever.
struct PendingConstruction<'a> {
    context: &'a Context,
    token: &'a MemoToken,
    finished: bool,
}

impl<'a> PendingConstruction<'a> {
    fn new(context: &'a Context, token: &'a MemoToken) -> Self {
        Self {
            context,
            token,
            finished: false,
        }
    }

    fn finish(&mut self) {
        self.finished = true;
    }
}

impl Drop for PendingConstruction<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.context.memo.lock().take_cell(self.token);
        }
    }
}
