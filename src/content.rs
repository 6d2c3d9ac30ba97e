//! Content values and their type identity.
//!
//! Any `'static` data-model value can be listed. The crate never inspects
//! content beyond its [`ContentType`]; rendering knowledge lives entirely in
//! the handler registered for that type.

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A data-model value that can appear in a list.
///
/// Blanket-implemented for every `Send + Sync + Debug + 'static` type, so
/// content types need no opt-in.
pub trait Content: Any + Send + Sync + fmt::Debug {
    /// View this value as `Any` for downcasting by its handler.
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any + Send + Sync + fmt::Debug> Content for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Identity of a content type.
///
/// Equality and hashing use the compiler-assigned [`TypeId`]; the type name
/// is carried only for error messages and logs.
#[derive(Clone, Copy)]
pub struct ContentType {
    id: TypeId,
    name: &'static str,
}

impl ContentType {
    /// Identity of content type `C`.
    pub fn of<C: Content>() -> Self {
        Self {
            id: TypeId::of::<C>(),
            name: std::any::type_name::<C>(),
        }
    }

    /// Rust type name, for diagnostics only.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for ContentType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ContentType {}

impl Hash for ContentType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ContentType").field(&self.name).finish()
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Note(#[allow(dead_code)] String);

    #[derive(Debug)]
    struct Photo;

    #[test]
    fn same_type_yields_equal_identity() {
        assert_eq!(ContentType::of::<Note>(), ContentType::of::<Note>());
    }

    #[test]
    fn distinct_types_yield_distinct_identity() {
        assert_ne!(ContentType::of::<Note>(), ContentType::of::<Photo>());
    }

    #[test]
    fn name_is_the_rust_type_name() {
        assert!(ContentType::of::<Photo>().name().ends_with("Photo"));
    }

    #[test]
    fn as_any_downcasts_to_concrete_type() {
        let note = Note("hi".to_string());
        let content: &dyn Content = &note;
        assert!(content.as_any().downcast_ref::<Note>().is_some());
        assert!(content.as_any().downcast_ref::<Photo>().is_none());
    }
}
