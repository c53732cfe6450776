//! Per-session application store.
//!
//! Holds the three slices a shopper's views read from (`user`, `products`,
//! `cart`), applies named [`Action`]s through the pure [`reduce`] function,
//! and notifies subscribers after every update.
//!
//! # Stale updates
//!
//! Remote calls are not coordinated with each other. A view that is about to
//! call the remote service takes a [`Ticket`] for the slot it will write
//! (`Store::begin`) and commits the result with `Store::dispatch_current`.
//! If a newer ticket for the same slot was issued in the meantime, the late
//! result is dropped instead of overwriting fresher state.
//!
//! # Example
//!
//! ```rust,ignore
//! let store = Store::new();
//! let subscription = store.subscribe(|snapshot| {
//!     tracing::debug!(cart_count = snapshot.cart_count(), "store changed");
//! });
//!
//! let ticket = store.begin(Slot::Products);
//! let products = api.fetch_products().await?;
//! store.dispatch_current(&ticket, Action::SetProducts(products));
//!
//! subscription.unsubscribe();
//! ```

mod reducer;

pub use reducer::{Action, reduce};

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock, Weak};

use cartwheel_core::{CartItem, Price, Product, ProductId, User};
use tracing::debug;

// =============================================================================
// Snapshot
// =============================================================================

/// An immutable view of the store at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    /// The signed-in shopper, if any.
    pub user: Option<User>,
    /// The most recently fetched catalog.
    pub products: Vec<Product>,
    /// Cart lines in the order they were first added.
    pub cart: Vec<CartItem>,
}

impl Snapshot {
    /// Sum of every line's `price x quantity`.
    #[must_use]
    pub fn cart_total(&self) -> Price {
        self.cart.iter().map(CartItem::line_total).sum()
    }

    /// Number of units in the cart.
    #[must_use]
    pub fn cart_count(&self) -> u32 {
        self.cart
            .iter()
            .fold(0u32, |count, line| count.saturating_add(line.quantity))
    }

    /// Look up a loaded product by id.
    #[must_use]
    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }
}

// =============================================================================
// Tickets
// =============================================================================

/// A slice that remote calls write into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    User,
    Products,
}

impl Slot {
    const COUNT: usize = 2;

    const fn index(self) -> usize {
        match self {
            Self::User => 0,
            Self::Products => 1,
        }
    }
}

/// Proof that a remote call was started at a given generation of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a ticket only matters if its result is committed with dispatch_current"]
pub struct Ticket {
    slot: Slot,
    generation: u64,
}

// =============================================================================
// Store
// =============================================================================

type Listener = Arc<dyn Fn(&Snapshot) + Send + Sync>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(u64, Listener)>,
}

struct StoreInner {
    state: RwLock<Arc<Snapshot>>,
    listeners: Mutex<Listeners>,
    /// Serializes listener delivery across concurrent dispatches.
    delivery: Mutex<()>,
    generations: [AtomicU64; Slot::COUNT],
}

/// The application store for one browsing session.
///
/// Cheap to clone; clones share the same state. Construct one per session
/// with [`Store::new`]; there is no global instance.
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("snapshot", &self.snapshot())
            .finish_non_exhaustive()
    }
}

impl Store {
    /// Create a store with all slices empty.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(StoreInner {
                state: RwLock::new(Arc::new(Snapshot::default())),
                listeners: Mutex::new(Listeners::default()),
                delivery: Mutex::new(()),
                generations: [AtomicU64::new(0), AtomicU64::new(0)],
            }),
        }
    }

    /// Current state. Never blocks on subscribers and has no side effects.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Snapshot> {
        let guard = self
            .inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Register `listener` to run after every update operation.
    ///
    /// The listener receives the newest state at delivery time, which
    /// includes that update. Deliveries never go backwards: when two updates
    /// race, the last call a listener sees carries the final state. Listeners
    /// may read the store or subscribe, but must not dispatch.
    /// Dropping the returned [`Subscription`] unsubscribes.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&Snapshot) + Send + Sync + 'static,
    {
        let mut listeners = self
            .inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let id = listeners.next_id;
        listeners.next_id += 1;
        listeners.entries.push((id, Arc::new(listener)));

        Subscription {
            store: Arc::downgrade(&self.inner),
            id,
        }
    }

    /// Number of active subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }

    /// Apply `action` and notify subscribers.
    pub fn dispatch(&self, action: Action) {
        debug!(action = action.name(), "store dispatch");
        {
            let mut guard = self
                .inner
                .state
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            reduce(Arc::make_mut(&mut *guard), action);
        }
        self.notify();
    }

    /// Replace the `user` slice.
    pub fn set_user(&self, user: User) {
        self.dispatch(Action::SetUser(user));
    }

    /// Clear the `user` slice.
    pub fn clear_user(&self) {
        self.dispatch(Action::ClearUser);
    }

    /// Replace the `products` slice wholesale.
    pub fn set_products(&self, products: Vec<Product>) {
        self.dispatch(Action::SetProducts(products));
    }

    /// Add a line to the cart.
    pub fn add_to_cart(&self, item: CartItem) {
        self.dispatch(Action::AddToCart(item));
    }

    /// Remove every cart line with `id`.
    pub fn remove_from_cart(&self, id: ProductId) {
        self.dispatch(Action::RemoveFromCart(id));
    }

    /// Start a remote call that will write `slot`.
    ///
    /// Invalidates every ticket previously issued for the same slot.
    pub fn begin(&self, slot: Slot) -> Ticket {
        let generation = self.generation(slot).fetch_add(1, Ordering::AcqRel) + 1;
        Ticket { slot, generation }
    }

    /// Whether `ticket` is still the newest for its slot.
    #[must_use]
    pub fn is_current(&self, ticket: &Ticket) -> bool {
        self.generation(ticket.slot).load(Ordering::Acquire) == ticket.generation
    }

    /// Apply `action` only if `ticket` is still current.
    ///
    /// Returns `false` (and notifies nobody) when the result is stale.
    pub fn dispatch_current(&self, ticket: &Ticket, action: Action) -> bool {
        {
            let mut guard = self
                .inner
                .state
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            if !self.is_current(ticket) {
                debug!(
                    action = action.name(),
                    slot = ?ticket.slot,
                    "discarding stale remote result"
                );
                return false;
            }
            debug!(action = action.name(), "store dispatch");
            reduce(Arc::make_mut(&mut *guard), action);
        }
        self.notify();
        true
    }

    fn generation(&self, slot: Slot) -> &AtomicU64 {
        // Slot::index is always < Slot::COUNT.
        #[allow(clippy::indexing_slicing)]
        &self.inner.generations[slot.index()]
    }

    /// Call every listener with the newest snapshot.
    ///
    /// The state lock is released first; `delivery` keeps concurrent
    /// notifications from interleaving, and reading the snapshot under it
    /// keeps deliveries monotonic.
    fn notify(&self) {
        let _delivery = self
            .inner
            .delivery
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let snapshot = self.snapshot();

        let listeners: Vec<Listener> = self
            .inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in listeners {
            listener(&snapshot);
        }
    }
}

// =============================================================================
// Subscription
// =============================================================================

/// Handle for a registered listener. Unsubscribes when dropped.
#[must_use = "dropping a Subscription immediately unsubscribes"]
pub struct Subscription {
    store: Weak<StoreInner>,
    id: u64,
}

impl Subscription {
    /// Stop receiving notifications.
    ///
    /// Notifications that start after this returns never reach the listener.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.store.upgrade() {
            inner
                .listeners
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .entries
                .retain(|(id, _)| *id != self.id);
        }
    }
}
