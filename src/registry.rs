//! Type registry: content type → (view type, handler).
//!
//! The registry is built once at startup and then shared read-only. A
//! content type's [`ViewType`] is its position in registration order, so the
//! same registration sequence always yields the same ids. Ids are only
//! meaningful inside one process run and are never persisted.
//!
//! Registration takes `&mut self`. Once the registry is wrapped in an `Arc`
//! and handed to a [`DispatchAdapter`](crate::adapter::DispatchAdapter), no
//! further registration can happen, which gives the register-then-read
//! ordering the rendering path relies on.

use crate::content::{Content, ContentType};
use crate::error::DispatchError;
use crate::handler::{DynRenderHandler, Erased, RenderHandler};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{error, info, warn};

/// Registration-order identifier of a content type. 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ViewType(usize);

impl ViewType {
    /// Create a view type from a raw index.
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Get the raw index.
    pub fn get(&self) -> usize {
        self.0
    }
}

impl fmt::Display for ViewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What `register` does when a content type is already registered.
///
/// Every policy keeps exactly one view type per content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// Keep the existing view type, swap in the new handler.
    #[default]
    Replace,
    /// Keep the existing view type and handler, drop the new handler.
    KeepFirst,
    /// Fail with [`DispatchError::Configuration`].
    Reject,
}

/// Lookup counters, for observing how often the registry is consulted.
#[derive(Debug, Default)]
pub struct RegistryStats {
    content_lookups: AtomicU64,
    handler_lookups: AtomicU64,
}

impl RegistryStats {
    /// Number of `type_id_for` calls (content type → view type).
    pub fn content_lookups(&self) -> u64 {
        self.content_lookups.load(Ordering::Relaxed)
    }

    /// Number of `handler_for` calls (view type → handler).
    pub fn handler_lookups(&self) -> u64 {
        self.handler_lookups.load(Ordering::Relaxed)
    }
}

struct Entry<S> {
    content_type: ContentType,
    handler: Box<dyn DynRenderHandler<S>>,
}

/// Maps content types to view types and render handlers.
///
/// Generic over the surface type `S` every registered handler produces.
pub struct TypeRegistry<S> {
    entries: Vec<Entry<S>>,
    by_content: HashMap<ContentType, ViewType>,
    policy: DuplicatePolicy,
    stats: RegistryStats,
}

impl<S> TypeRegistry<S> {
    /// Create an empty registry with the default [`DuplicatePolicy`].
    pub fn new() -> Self {
        Self::with_policy(DuplicatePolicy::default())
    }

    /// Create an empty registry with an explicit duplicate policy.
    pub fn with_policy(policy: DuplicatePolicy) -> Self {
        Self {
            entries: Vec::new(),
            by_content: HashMap::new(),
            policy,
            stats: RegistryStats::default(),
        }
    }

    /// The duplicate policy this registry applies.
    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    /// Register `handler` for its content type.
    ///
    /// A new content type receives the next view type (the current number of
    /// entries). Registering an already-known content type follows the
    /// registry's [`DuplicatePolicy`] and returns the existing view type.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Configuration`] for a duplicate under
    /// [`DuplicatePolicy::Reject`].
    pub fn register<H>(&mut self, handler: H) -> Result<ViewType, DispatchError>
    where
        H: RenderHandler<S> + 'static,
        S: 'static,
    {
        let content_type = ContentType::of::<H::Content>();

        if let Some(&existing) = self.by_content.get(&content_type) {
            return match self.policy {
                DuplicatePolicy::Replace => {
                    warn!(%content_type, view_type = %existing, "Replacing render handler");
                    self.entries[existing.get()].handler = Box::new(Erased(handler));
                    Ok(existing)
                }
                DuplicatePolicy::KeepFirst => {
                    warn!(%content_type, view_type = %existing, "Ignoring duplicate registration");
                    Ok(existing)
                }
                DuplicatePolicy::Reject => Err(DispatchError::Configuration {
                    reason: format!(
                        "content type `{content_type}` is already registered as view type {existing}"
                    ),
                }),
            };
        }

        let view_type = ViewType::new(self.entries.len());
        self.entries.push(Entry {
            content_type,
            handler: Box::new(Erased(handler)),
        });
        self.by_content.insert(content_type, view_type);
        info!(%content_type, %view_type, "Registered render handler");
        Ok(view_type)
    }

    /// View type registered for content type `C`.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::UnregisteredType`] if `C` was never registered.
    pub fn type_id_for<C: Content>(&self) -> Result<ViewType, DispatchError> {
        self.type_id_for_content_type(ContentType::of::<C>())
    }

    /// View type registered for an already-computed [`ContentType`].
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::UnregisteredType`] if the type was never registered.
    pub fn type_id_for_content_type(
        &self,
        content_type: ContentType,
    ) -> Result<ViewType, DispatchError> {
        self.stats.content_lookups.fetch_add(1, Ordering::Relaxed);
        self.by_content
            .get(&content_type)
            .copied()
            .ok_or(DispatchError::UnregisteredType {
                type_name: content_type.name(),
            })
    }

    /// Handler registered under `view_type`.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::UnknownType`] if `view_type` is out of range.
    pub fn handler_for(
        &self,
        view_type: ViewType,
    ) -> Result<&dyn DynRenderHandler<S>, DispatchError> {
        self.stats.handler_lookups.fetch_add(1, Ordering::Relaxed);
        match self.entries.get(view_type.get()) {
            Some(entry) => Ok(entry.handler.as_ref()),
            None => {
                let err = DispatchError::UnknownType {
                    view_type,
                    registered: self.entries.len(),
                };
                error!(%view_type, registered = self.entries.len(), "Registry desynchronised");
                Err(err)
            }
        }
    }

    /// Content type registered under `view_type`, if any.
    pub fn content_type_of(&self, view_type: ViewType) -> Option<ContentType> {
        self.entries.get(view_type.get()).map(|e| e.content_type)
    }

    /// Registered content types in view-type order.
    pub fn content_types(&self) -> impl Iterator<Item = (ViewType, ContentType)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| (ViewType::new(i), e.content_type))
    }

    /// Number of registered content types.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lookup counters.
    pub fn stats(&self) -> &RegistryStats {
        &self.stats
    }
}

impl<S> Default for TypeRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> fmt::Debug for TypeRegistry<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field(
                "types",
                &self.entries.iter().map(|e| e.content_type).collect::<Vec<_>>(),
            )
            .field("policy", &self.policy)
            .finish()
    }
}
