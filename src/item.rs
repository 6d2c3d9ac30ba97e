//! List items: content paired with its resolved view type.
//!
//! The view type is resolved exactly once, when the item is built. Scrolling
//! reads the cached value and never consults the registry again. Items are
//! immutable; replacing content means building a new item.

use crate::content::{Content, ContentType};
use crate::error::DispatchError;
use crate::registry::{TypeRegistry, ViewType};
use std::fmt;
use std::sync::Arc;

/// A content value and the view type resolved for it.
#[derive(Clone)]
pub struct ListItem {
    content: Arc<dyn Content>,
    content_type: ContentType,
    view_type: ViewType,
}

impl ListItem {
    /// Resolve `content`'s view type against `registry` and wrap it.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::UnregisteredType`] naming `C` if the content
    /// type was never registered.
    pub fn new<C: Content, S>(
        registry: &TypeRegistry<S>,
        content: C,
    ) -> Result<Self, DispatchError> {
        Self::from_arc(registry, Arc::new(content))
    }

    /// Like [`ListItem::new`], for content already shared behind an `Arc`.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::UnregisteredType`] if `C` was never registered.
    pub fn from_arc<C: Content, S>(
        registry: &TypeRegistry<S>,
        content: Arc<C>,
    ) -> Result<Self, DispatchError> {
        let content_type = ContentType::of::<C>();
        let view_type = registry.type_id_for_content_type(content_type)?;
        Ok(Self {
            content,
            content_type,
            view_type,
        })
    }

    /// The cached view type.
    pub fn view_type(&self) -> ViewType {
        self.view_type
    }

    /// Identity of the wrapped content's type.
    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    /// The wrapped content, type-erased.
    pub fn content(&self) -> &dyn Content {
        &*self.content
    }

    /// The wrapped content as `C`, if that is its type.
    pub fn downcast_ref<C: Content>(&self) -> Option<&C> {
        self.content().as_any().downcast_ref::<C>()
    }
}

impl fmt::Debug for ListItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListItem")
            .field("view_type", &self.view_type)
            .field("content", &self.content)
            .finish()
    }
}

/// Builds a sequence of [`ListItem`]s against one registry.
///
/// Fails on the first unregistered content, naming its type, so a missing
/// registration is caught at the item that needs it.
///
/// ```
/// use polyview::handler::RenderHandler;
/// use polyview::item::ItemsBuilder;
/// use polyview::registry::TypeRegistry;
///
/// #[derive(Debug)]
/// struct Text(String);
///
/// struct TextHandler;
///
/// impl RenderHandler<String> for TextHandler {
///     type Content = Text;
///     fn create_surface(&self) -> String {
///         String::new()
///     }
///     fn bind(&self, surface: &mut String, content: &Text) {
///         surface.clone_from(&content.0);
///     }
/// }
///
/// let mut registry = TypeRegistry::new();
/// registry.register(TextHandler).unwrap();
///
/// let items = ItemsBuilder::new(&registry)
///     .push(Text("a".into()))
///     .unwrap()
///     .push(Text("b".into()))
///     .unwrap()
///     .build();
/// assert_eq!(items.len(), 2);
/// ```
pub struct ItemsBuilder<'r, S> {
    registry: &'r TypeRegistry<S>,
    items: Vec<ListItem>,
}

impl<'r, S> ItemsBuilder<'r, S> {
    /// Start an empty sequence.
    pub fn new(registry: &'r TypeRegistry<S>) -> Self {
        Self {
            registry,
            items: Vec::new(),
        }
    }

    /// Start an empty sequence with room for `capacity` items.
    pub fn with_capacity(registry: &'r TypeRegistry<S>, capacity: usize) -> Self {
        Self {
            registry,
            items: Vec::with_capacity(capacity),
        }
    }

    /// Resolve and append one content value.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::UnregisteredType`] if `C` was never registered.
    pub fn push<C: Content>(mut self, content: C) -> Result<Self, DispatchError> {
        self.push_mut(content)?;
        Ok(self)
    }

    /// Resolve and append one content value in place.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::UnregisteredType`] if `C` was never registered.
    pub fn push_mut<C: Content>(&mut self, content: C) -> Result<&mut Self, DispatchError> {
        self.items.push(ListItem::new(self.registry, content)?);
        Ok(self)
    }

    /// Number of items pushed so far.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if nothing has been pushed.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Finish the sequence.
    pub fn build(self) -> Vec<ListItem> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::RenderHandler;

    #[derive(Debug, PartialEq)]
    struct Text(&'static str);

    #[derive(Debug, PartialEq)]
    struct Image(&'static str);

    #[derive(Debug)]
    struct Poll;

    struct TextHandler;

    impl RenderHandler<String> for TextHandler {
        type Content = Text;

        fn create_surface(&self) -> String {
            String::new()
        }

        fn bind(&self, surface: &mut String, content: &Text) {
            surface.clear();
            surface.push_str(content.0);
        }
    }

    struct ImageHandler;

    impl RenderHandler<String> for ImageHandler {
        type Content = Image;

        fn create_surface(&self) -> String {
            String::new()
        }

        fn bind(&self, surface: &mut String, content: &Image) {
            surface.clear();
            surface.push_str(content.0);
        }
    }

    fn registry() -> TypeRegistry<String> {
        let mut registry = TypeRegistry::new();
        registry.register(TextHandler).unwrap();
        registry.register(ImageHandler).unwrap();
        registry
    }

    #[test]
    fn new_resolves_view_type() {
        let registry = registry();
        let text = ListItem::new(&registry, Text("a")).unwrap();
        let image = ListItem::new(&registry, Image("u")).unwrap();

        assert_eq!(text.view_type(), ViewType::new(0));
        assert_eq!(image.view_type(), ViewType::new(1));
        assert_eq!(text.content_type(), ContentType::of::<Text>());
    }

    #[test]
    fn new_rejects_unregistered_content() {
        let registry = registry();
        let err = ListItem::new(&registry, Poll).unwrap_err();
        assert!(matches!(err, DispatchError::UnregisteredType { .. }));
    }

    #[test]
    fn view_type_is_resolved_once() {
        let registry = registry();
        let item = ListItem::new(&registry, Text("a")).unwrap();
        let lookups = registry.stats().content_lookups();

        for _ in 0..100 {
            assert_eq!(item.view_type(), ViewType::new(0));
        }
        let cloned = item.clone();
        assert_eq!(cloned.view_type(), ViewType::new(0));

        assert_eq!(registry.stats().content_lookups(), lookups);
    }

    #[test]
    fn downcast_ref_returns_original_content() {
        let registry = registry();
        let item = ListItem::new(&registry, Image("url")).unwrap();
        assert_eq!(item.downcast_ref::<Image>(), Some(&Image("url")));
        assert_eq!(item.downcast_ref::<Text>(), None);
    }

    #[test]
    fn from_arc_shares_content() {
        let registry = registry();
        let shared = Arc::new(Text("shared"));
        let item = ListItem::from_arc(&registry, Arc::clone(&shared)).unwrap();
        assert_eq!(Arc::strong_count(&shared), 2);
        assert_eq!(item.downcast_ref::<Text>(), Some(&Text("shared")));
    }

    #[test]
    fn builder_preserves_order() {
        let registry = registry();
        let items = ItemsBuilder::new(&registry)
            .push(Text("a"))
            .unwrap()
            .push(Image("u"))
            .unwrap()
            .push(Text("b"))
            .unwrap()
            .build();

        let view_types: Vec<_> = items.iter().map(|i| i.view_type().get()).collect();
        assert_eq!(view_types, vec![0, 1, 0]);
        assert_eq!(items[2].downcast_ref::<Text>(), Some(&Text("b")));
    }

    #[test]
    fn builder_fails_on_first_unregistered_content() {
        let registry = registry();
        let mut builder = ItemsBuilder::with_capacity(&registry, 3);
        builder.push_mut(Text("a")).unwrap();
        let err = builder.push_mut(Poll).err().unwrap();

        match err {
            DispatchError::UnregisteredType { type_name } => assert!(type_name.ends_with("Poll")),
            other => panic!("expected UnregisteredType, got {other:?}"),
        }
        assert_eq!(builder.len(), 1, "failed push must not append");
    }
}
