//! Dispatch adapter: the bridge a virtualized list calls into.
//!
//! The list widget owns layout and the recycling pool. For each position it
//! asks the adapter for the view type, creates surfaces through it when the
//! pool has none of that type, and asks it to bind a position into a surface.
//! The adapter routes every call to the handler registered for the item's
//! cached view type.
//!
//! All calls here are synchronous and allocation-light. They are meant for
//! the rendering thread's layout pass. Item replacements coming from other
//! threads go through an [`ItemsSender`] and become visible only when the
//! rendering thread calls [`DispatchAdapter::apply_pending`].

use crate::error::DispatchError;
use crate::item::ListItem;
use crate::registry::{TypeRegistry, ViewType};
use serde::Deserialize;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// A surface tagged with the view type it was created for.
///
/// The tag is fixed at creation. The adapter refuses (or replaces, depending
/// on [`MismatchPolicy`]) a surface whose tag differs from the position being
/// bound.
#[derive(Debug)]
pub struct TaggedSurface<S> {
    view_type: ViewType,
    surface: S,
}

impl<S> TaggedSurface<S> {
    /// View type this surface was created for.
    pub fn view_type(&self) -> ViewType {
        self.view_type
    }

    /// The underlying surface.
    pub fn get(&self) -> &S {
        &self.surface
    }

    /// The underlying surface, mutably. The tag stays fixed.
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Unwrap the underlying surface, dropping the tag.
    pub fn into_inner(self) -> S {
        self.surface
    }
}

/// What `bind_surface` does with a surface tagged for another view type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MismatchPolicy {
    /// Fail with [`DispatchError::TypeMismatch`].
    #[default]
    Fail,
    /// Replace the surface with a fresh one of the right type, then bind.
    ///
    /// Reported as [`BindOutcome::Recreated`] and logged at `warn`.
    Recreate,
}

/// Result of a successful [`DispatchAdapter::bind_surface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindOutcome {
    /// The surface matched and was bound in place.
    Bound,
    /// The surface was tagged for `previous` and had to be replaced.
    Recreated {
        /// View type of the discarded surface.
        previous: ViewType,
    },
}

/// Queues item sequences for an adapter from any thread.
///
/// Queued sequences are applied by the rendering thread via
/// [`DispatchAdapter::apply_pending`]. Cloneable and `Send`.
#[derive(Debug, Clone)]
pub struct ItemsSender {
    tx: Sender<Arc<[ListItem]>>,
}

impl ItemsSender {
    /// Queue `items` to replace the adapter's sequence.
    ///
    /// Returns `false` if the adapter has been dropped.
    pub fn send(&self, items: impl Into<Arc<[ListItem]>>) -> bool {
        self.tx.send(items.into()).is_ok()
    }
}

/// Routes list-widget requests to the registered render handlers.
pub struct DispatchAdapter<S> {
    registry: Arc<TypeRegistry<S>>,
    items: Arc<[ListItem]>,
    mismatch_policy: MismatchPolicy,
    generation: u64,
    pending_tx: Sender<Arc<[ListItem]>>,
    pending_rx: Receiver<Arc<[ListItem]>>,
}

impl<S> DispatchAdapter<S> {
    /// Create an adapter with no items.
    ///
    /// Taking the registry behind an `Arc` ends its registration phase: no
    /// handler can be added while the adapter reads from it.
    pub fn new(registry: Arc<TypeRegistry<S>>) -> Self {
        let (pending_tx, pending_rx) = mpsc::channel();
        Self {
            registry,
            items: Vec::<ListItem>::new().into(),
            mismatch_policy: MismatchPolicy::default(),
            generation: 0,
            pending_tx,
            pending_rx,
        }
    }

    /// Create an adapter over `items`.
    pub fn with_items(registry: Arc<TypeRegistry<S>>, items: impl Into<Arc<[ListItem]>>) -> Self {
        let mut adapter = Self::new(registry);
        adapter.items = items.into();
        adapter
    }

    /// Set how surfaces tagged for the wrong view type are handled.
    pub fn with_mismatch_policy(mut self, policy: MismatchPolicy) -> Self {
        self.mismatch_policy = policy;
        self
    }

    /// The registry this adapter dispatches through.
    pub fn registry(&self) -> &Arc<TypeRegistry<S>> {
        &self.registry
    }

    /// Current mismatch policy.
    pub fn mismatch_policy(&self) -> MismatchPolicy {
        self.mismatch_policy
    }

    /// Number of items in the backing sequence.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Check if the backing sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The item at `position`.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Index`] if `position` is out of bounds.
    pub fn item_at(&self, position: usize) -> Result<&ListItem, DispatchError> {
        self.items.get(position).ok_or(DispatchError::Index {
            position,
            len: self.items.len(),
        })
    }

    /// Cached view type of the item at `position`.
    ///
    /// Never consults the registry.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Index`] if `position` is out of bounds.
    pub fn type_id_at(&self, position: usize) -> Result<ViewType, DispatchError> {
        self.item_at(position).map(ListItem::view_type)
    }

    /// Create a fresh surface for `view_type`.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::UnknownType`] if `view_type` is not registered.
    pub fn create_surface(&self, view_type: ViewType) -> Result<TaggedSurface<S>, DispatchError> {
        let handler = self.registry.handler_for(view_type)?;
        debug!(%view_type, "Creating surface");
        Ok(TaggedSurface {
            view_type,
            surface: handler.create_surface(),
        })
    }

    /// Bind the item at `position` into `surface`.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::Index`] if `position` is out of bounds.
    /// - [`DispatchError::TypeMismatch`] if the surface's tag differs from the
    ///   item's view type and the policy is [`MismatchPolicy::Fail`].
    /// - [`DispatchError::UnknownType`] / [`DispatchError::ContentMismatch`] if
    ///   the item was resolved against a different registry.
    pub fn bind_surface(
        &self,
        surface: &mut TaggedSurface<S>,
        position: usize,
    ) -> Result<BindOutcome, DispatchError> {
        let item = self.item_at(position)?;
        let expected = item.view_type();

        let mut outcome = BindOutcome::Bound;
        if surface.view_type != expected {
            match self.mismatch_policy {
                MismatchPolicy::Fail => {
                    return Err(DispatchError::TypeMismatch {
                        position,
                        surface: surface.view_type,
                        expected,
                    });
                }
                MismatchPolicy::Recreate => {
                    warn!(
                        position,
                        surface = %surface.view_type,
                        %expected,
                        "Surface bound to wrong view type, recreating"
                    );
                    outcome = BindOutcome::Recreated {
                        previous: surface.view_type,
                    };
                    *surface = self.create_surface(expected)?;
                }
            }
        }

        trace!(position, view_type = %expected, "Binding surface");
        self.registry.handler_for(expected)?.bind_dyn(
            expected,
            &mut surface.surface,
            item.content(),
            item.content_type(),
        )?;
        Ok(outcome)
    }

    /// Replace the backing sequence.
    ///
    /// The swap is a single assignment, so any reader sees either the old or
    /// the new sequence in full. Item view types are not re-resolved. The
    /// list widget must re-query positions afterwards.
    pub fn set_items(&mut self, items: impl Into<Arc<[ListItem]>>) {
        self.items = items.into();
        self.generation += 1;
        debug!(
            items = self.items.len(),
            generation = self.generation,
            "Items replaced"
        );
    }

    /// The current backing sequence.
    pub fn snapshot(&self) -> Arc<[ListItem]> {
        Arc::clone(&self.items)
    }

    /// Counter bumped on every [`set_items`](Self::set_items).
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// A handle for queueing replacements from other threads.
    pub fn items_sender(&self) -> ItemsSender {
        ItemsSender {
            tx: self.pending_tx.clone(),
        }
    }

    /// Apply queued replacements. Call on the rendering thread.
    ///
    /// Only the newest queued sequence becomes visible. Returns `true` if the
    /// sequence changed.
    pub fn apply_pending(&mut self) -> bool {
        let Some(newest) = self.pending_rx.try_iter().last() else {
            return false;
        };
        self.set_items(newest);
        true
    }
}

impl<S> std::fmt::Debug for DispatchAdapter<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchAdapter")
            .field("registry", &self.registry)
            .field("items", &self.items.len())
            .field("mismatch_policy", &self.mismatch_policy)
            .field("generation", &self.generation)
            .finish()
    }
}
