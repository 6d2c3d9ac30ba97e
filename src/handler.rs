//! Render handlers: one per content type.
//!
//! A [`RenderHandler`] knows how to build an empty surface and how to write one
//! content value into it. The registry stores handlers behind the object-safe
//! [`DynRenderHandler`] so a single table can hold handlers for many content
//! types that all share one surface type `S`.

use crate::content::{Content, ContentType};
use crate::error::DispatchError;
use crate::registry::ViewType;

/// Creates and populates surfaces for one content type.
///
/// # Contract
///
/// - `create_surface` must not depend on any content instance.
/// - `bind` must be idempotent: binding the same content twice leaves the
///   surface in the same observable state as binding it once. In practice this
///   means clearing whatever a previous bind wrote before writing.
/// - Both run on the rendering thread and must not block or perform I/O.
pub trait RenderHandler<S>: Send + Sync {
    /// The content type this handler renders.
    type Content: Content;

    /// Allocate a new, unbound surface.
    fn create_surface(&self) -> S;

    /// Write `content` into `surface`.
    fn bind(&self, surface: &mut S, content: &Self::Content);
}

/// Type-erased view of a [`RenderHandler`], as stored in the registry.
pub trait DynRenderHandler<S>: Send + Sync {
    /// Content type the underlying handler was written for.
    fn content_type(&self) -> ContentType;

    /// Allocate a new, unbound surface.
    fn create_surface(&self) -> S;

    /// Downcast `content` to the handler's content type and bind it.
    ///
    /// `content_type` is the identity recorded when the content was wrapped,
    /// reported in the error if the downcast fails.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::ContentMismatch`] if `content` is not of the
    /// handler's content type.
    fn bind_dyn(
        &self,
        view_type: ViewType,
        surface: &mut S,
        content: &dyn Content,
        content_type: ContentType,
    ) -> Result<(), DispatchError>;
}

/// Adapter erasing a concrete handler's content type.
pub(crate) struct Erased<H>(pub(crate) H);

impl<S, H> DynRenderHandler<S> for Erased<H>
where
    H: RenderHandler<S>,
{
    fn content_type(&self) -> ContentType {
        ContentType::of::<H::Content>()
    }

    fn create_surface(&self) -> S {
        self.0.create_surface()
    }

    fn bind_dyn(
        &self,
        view_type: ViewType,
        surface: &mut S,
        content: &dyn Content,
        content_type: ContentType,
    ) -> Result<(), DispatchError> {
        let typed = content
            .as_any()
            .downcast_ref::<H::Content>()
            .ok_or_else(|| DispatchError::ContentMismatch {
                view_type,
                expected: ContentType::of::<H::Content>().name(),
                found: content_type.name(),
            })?;
        self.0.bind(surface, typed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Label(String);

    #[derive(Debug)]
    #[allow(dead_code)]
    struct Counter(u32);

    struct LabelHandler;

    impl RenderHandler<Vec<String>> for LabelHandler {
        type Content = Label;

        fn create_surface(&self) -> Vec<String> {
            Vec::new()
        }

        fn bind(&self, surface: &mut Vec<String>, content: &Label) {
            surface.clear();
            surface.push(content.0.clone());
        }
    }

    #[test]
    fn erased_handler_reports_its_content_type() {
        let erased: Box<dyn DynRenderHandler<Vec<String>>> = Box::new(Erased(LabelHandler));
        assert_eq!(erased.content_type(), ContentType::of::<Label>());
    }

    #[test]
    fn erased_handler_binds_matching_content() {
        let erased = Erased(LabelHandler);
        let mut surface = DynRenderHandler::<Vec<String>>::create_surface(&erased);
        erased
            .bind_dyn(
                ViewType::new(0),
                &mut surface,
                &Label("hello".to_string()),
                ContentType::of::<Label>(),
            )
            .unwrap();
        assert_eq!(surface, vec!["hello".to_string()]);
    }

    #[test]
    fn erased_handler_rejects_foreign_content() {
        let erased = Erased(LabelHandler);
        let mut surface: Vec<String> = Vec::new();
        let err = erased
            .bind_dyn(
                ViewType::new(3),
                &mut surface,
                &Counter(1),
                ContentType::of::<Counter>(),
            )
            .unwrap_err();
        match err {
            DispatchError::ContentMismatch {
                view_type,
                expected,
                found,
            } => {
                assert_eq!(view_type, ViewType::new(3));
                assert!(expected.ends_with("Label"));
                assert!(found.ends_with("Counter"));
            }
            other => panic!("expected ContentMismatch, got {other:?}"),
        }
        assert!(surface.is_empty(), "failed bind must not touch the surface");
    }

    #[test]
    fn bind_twice_matches_bind_once() {
        let handler = LabelHandler;
        let content = Label("same".to_string());

        let mut once = handler.create_surface();
        handler.bind(&mut once, &content);

        let mut twice = handler.create_surface();
        handler.bind(&mut twice, &content);
        handler.bind(&mut twice, &content);

        assert_eq!(once, twice);
    }
}
