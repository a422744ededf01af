//! The subscribable state container.
//!
//! # Dispatch model
//!
//! - Actions are applied one at a time. Each application builds a new
//!   [`AppState`], swaps it in, then calls every listener that was
//!   registered when the notification started.
//! - A dispatch made from inside a listener is queued and applied after
//!   the current notification finishes, so listeners always see versions
//!   in order.
//! - A dispatch from another thread waits for the running drain to finish
//!   and returns once its own action has been applied.
//! - Listeners must not block on work that itself dispatches from another
//!   thread; that thread would wait for the listener forever.
//! - `dispatch` holds a `std::sync::Mutex` only while reducers and
//!   listeners run. Reducers are pure and never await, so an async caller
//!   blocks its worker thread for at most one drain. Slow listeners stretch
//!   that window for every dispatching task; keep them short.
//!
//! # Pending operations
//!
//! An async operation opens with [`Store::begin`], which dispatches its
//! `*Requested` action and returns a [`Pending`] guard. Settling the guard
//! dispatches the outcome. Dropping it unsettled, as happens when the
//! operation's future is cancelled, dispatches the `*Abandoned` action so
//! loading counts never leak.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, Weak};
use std::thread::{self, ThreadId};

use crate::action::Action;
use crate::state::AppState;
use crate::telemetry;

type Listener = Arc<dyn Fn(&AppState) + Send + Sync>;

/// Shared, cheaply cloneable handle to the application state.
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    state: RwLock<Arc<AppState>>,
    listeners: Mutex<Listeners>,
    queue: Mutex<DispatchQueue>,
    serial: Mutex<()>,
}

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(u64, Listener)>,
}

#[derive(Default)]
struct DispatchQueue {
    pending: VecDeque<Action>,
    drainer: Option<ThreadId>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("version", &self.state().version)
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl Store {
    /// Create a store with the fallback catalog, an empty cart and no session.
    #[must_use]
    pub fn new() -> Self {
        Self::with_state(AppState::default())
    }

    /// Create a store starting from `state`.
    #[must_use]
    pub fn with_state(state: AppState) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                state: RwLock::new(Arc::new(state)),
                listeners: Mutex::new(Listeners::default()),
                queue: Mutex::new(DispatchQueue::default()),
                serial: Mutex::new(()),
            }),
        }
    }

    /// The current snapshot.
    #[must_use]
    pub fn state(&self) -> Arc<AppState> {
        let guard = self
            .inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Apply an action and notify subscribers.
    ///
    /// Returns after the action has been applied, except when called from
    /// inside a listener: then the action is queued behind the current
    /// notification and applied before the outermost dispatch returns.
    pub fn dispatch(&self, action: impl Into<Action>) {
        let current = thread::current().id();
        {
            let mut queue = lock(&self.inner.queue);
            queue.pending.push_back(action.into());
            if queue.drainer == Some(current) {
                return;
            }
        }

        let _serial = lock(&self.inner.serial);
        let _drain = DrainGuard::enter(&self.inner.queue, current);

        loop {
            let next = lock(&self.inner.queue).pending.pop_front();
            match next {
                Some(action) => self.apply(action),
                None => break,
            }
        }
    }

    /// Dispatch `requested` and return a guard that dispatches `abandoned`
    /// unless it is settled first.
    pub(crate) fn begin(
        &self,
        requested: impl Into<Action>,
        abandoned: impl Into<Action>,
    ) -> Pending {
        self.dispatch(requested);
        Pending {
            store: self.clone(),
            abandoned: Some(abandoned.into()),
        }
    }

    /// Register a listener called with every new snapshot.
    ///
    /// The listener stays registered until the returned [`Subscription`] is
    /// dropped or [`Subscription::unsubscribe`] is called. A listener added
    /// while a notification is running first hears about the next one.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&AppState) + Send + Sync + 'static,
    {
        let mut listeners = lock(&self.inner.listeners);
        let id = listeners.next_id;
        listeners.next_id += 1;
        listeners.entries.push((id, Arc::new(listener)));

        Subscription {
            id,
            store: Arc::downgrade(&self.inner),
        }
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        lock(&self.inner.listeners).entries.len()
    }

    fn apply(&self, action: Action) {
        let name = action.name();

        let snapshot = {
            let mut state = self
                .inner
                .state
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            let next = Arc::new(state.reduce(action));
            *state = Arc::clone(&next);
            next
        };

        tracing::debug!(action = name, version = snapshot.version, "action applied");
        telemetry::add_breadcrumb("store", name, None);

        let listeners: Vec<Listener> = lock(&self.inner.listeners)
            .entries
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in listeners {
            listener(&snapshot);
        }
    }
}

/// Handle returned by [`Store::subscribe`]; dropping it unsubscribes.
#[must_use = "dropping a Subscription immediately unsubscribes the listener"]
pub struct Subscription {
    id: u64,
    store: Weak<StoreInner>,
}

impl Subscription {
    /// Stop receiving notifications.
    ///
    /// Safe to call from inside a listener; takes effect before the next
    /// notification starts.
    pub fn unsubscribe(self) {
        drop(self);
    }

    /// Keep the listener registered for the lifetime of the store.
    pub fn detach(mut self) {
        self.store = Weak::new();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.store.upgrade() {
            lock(&inner.listeners)
                .entries
                .retain(|(id, _)| *id != self.id);
        }
    }
}

/// An operation that has dispatched its `*Requested` action and owes the
/// store exactly one settling action.
#[must_use = "dropping a Pending immediately abandons the operation"]
pub(crate) struct Pending {
    store: Store,
    abandoned: Option<Action>,
}

impl Pending {
    /// Dispatch the operation's outcome in place of the abandon action.
    pub(crate) fn settle(mut self, outcome: impl Into<Action>) {
        self.abandoned = None;
        self.store.dispatch(outcome);
    }
}

impl Drop for Pending {
    fn drop(&mut self) {
        if let Some(action) = self.abandoned.take() {
            tracing::debug!(action = action.name(), "Operation dropped before settling");
            self.store.dispatch(action);
        }
    }
}

/// Marks the current thread as the drainer; cleared even if a listener panics.
struct DrainGuard<'a> {
    queue: &'a Mutex<DispatchQueue>,
}

impl<'a> DrainGuard<'a> {
    fn enter(queue: &'a Mutex<DispatchQueue>, thread: ThreadId) -> Self {
        lock(queue).drainer = Some(thread);
        Self { queue }
    }
}

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        lock(self.queue).drainer = None;
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use shopmall_core::{CategoryFilter, Price, ProductId};

    use super::*;
    use crate::action::{CartAction, CatalogAction};

    fn add(id: i32) -> CartAction {
        CartAction::AddItem {
            product_id: ProductId::new(id),
            title: format!("Item {id}"),
            price: Price::from_cents(100),
            image: String::new(),
        }
    }

    #[test]
    fn test_pending_settles_once() {
        let store = Store::new();
        let pending = store.begin(
            CatalogAction::ProductsRequested,
            CatalogAction::ProductsAbandoned,
        );
        assert!(store.state().catalog.products_status().is_loading());

        pending.settle(CatalogAction::ProductsFulfilled(vec![]));
        let state = store.state();
        assert!(!state.catalog.products_status().is_loading());
        assert!(state.catalog.products().is_empty());
        assert_eq!(state.version, 2);
    }

    #[test]
    fn test_dropped_pending_dispatches_abandon() {
        let store = Store::new();
        let before = store.state();
        drop(store.begin(
            CatalogAction::CategoriesRequested,
            CatalogAction::CategoriesAbandoned,
        ));

        let after = store.state();
        assert_eq!(after.version, before.version + 2);
        assert_eq!(after.catalog.categories_status().in_flight(), 0);
        assert_eq!(after.catalog.categories(), before.catalog.categories());
    }

    #[test]
    fn test_dispatch_replaces_only_owning_slice() {
        let store = Store::new();
        let before = store.state();
        store.dispatch(add(1));
        let after = store.state();

        assert_eq!(after.version, before.version + 1);
        assert!(!Arc::ptr_eq(&before.cart, &after.cart));
        assert!(Arc::ptr_eq(&before.catalog, &after.catalog));
        assert!(Arc::ptr_eq(&before.session, &after.session));
    }

    #[test]
    fn test_listener_receives_new_snapshot() {
        let store = Store::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _sub = store.subscribe(move |state| {
            sink.lock().unwrap().push(state.cart.lines().len());
        });

        store.dispatch(add(1));
        store.dispatch(add(2));
        assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_unsubscribe_by_drop_and_explicit() {
        let store = Store::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&calls);
        let first = store.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let counter = Arc::clone(&calls);
        let second = store.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(store.listener_count(), 2);

        store.dispatch(add(1));
        first.unsubscribe();
        store.dispatch(add(1));
        drop(second);
        store.dispatch(add(1));

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(store.listener_count(), 0);
    }

    #[test]
    fn test_detach_keeps_listener() {
        let store = Store::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        store
            .subscribe(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .detach();

        store.dispatch(add(1));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.listener_count(), 1);
    }

    #[test]
    fn test_listener_added_during_notification_waits_for_next() {
        let store = Store::new();
        let late_calls = Arc::new(AtomicUsize::new(0));
        let late_subs = Arc::new(Mutex::new(Vec::new()));

        let handle = store.clone();
        let calls = Arc::clone(&late_calls);
        let subs = Arc::clone(&late_subs);
        let _outer = store.subscribe(move |state| {
            if state.version == 1 {
                let calls = Arc::clone(&calls);
                let sub = handle.subscribe(move |_| {
                    calls.fetch_add(1, Ordering::SeqCst);
                });
                subs.lock().unwrap().push(sub);
            }
        });

        store.dispatch(add(1));
        assert_eq!(late_calls.load(Ordering::SeqCst), 0);

        store.dispatch(add(2));
        assert_eq!(late_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unsubscribe_during_notification() {
        let store = Store::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let slot: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));

        let counter = Arc::clone(&calls);
        let own = Arc::clone(&slot);
        let sub = store.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            if let Some(sub) = own.lock().unwrap().take() {
                sub.unsubscribe();
            }
        });
        *slot.lock().unwrap() = Some(sub);

        store.dispatch(add(1));
        store.dispatch(add(2));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.listener_count(), 0);
    }

    #[test]
    fn test_nested_dispatch_runs_after_current_notification() {
        let store = Store::new();
        let seen_by_second = Arc::new(Mutex::new(Vec::new()));

        let handle = store.clone();
        let _first = store.subscribe(move |state| {
            if state.version == 1 {
                handle.dispatch(CatalogAction::SelectCategory(CategoryFilter::from("home")));
            }
        });
        let sink = Arc::clone(&seen_by_second);
        let _second = store.subscribe(move |state| {
            sink.lock().unwrap().push(state.version);
        });

        store.dispatch(add(1));

        assert_eq!(*seen_by_second.lock().unwrap(), vec![1, 2]);
        let state = store.state();
        assert_eq!(state.version, 2);
        assert_eq!(state.catalog.selected(), &CategoryFilter::from("home"));
    }

    #[test]
    fn test_concurrent_dispatch_from_threads() {
        let store = Store::new();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                thread::spawn(move || {
                    for _ in 0..100 {
                        store.dispatch(add(1));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let state = store.state();
        assert_eq!(state.version, 800);
        assert_eq!(state.cart.line(ProductId::new(1)).unwrap().quantity, 800);
        assert_eq!(state.cart.total(), Price::from_cents(80_000));
    }
}
