//! Scope stack shared in shape by collection and binding.
//!
//! The collector keeps a `ScopeStack<DeclId>` and the binder a
//! `ScopeStack<SymbolId>`. Nothing here resolves names.

use tracing::warn;

#[derive(Clone, Debug)]
struct Frame<T> {
    parent: T,
    name: String,
}

#[derive(Clone, Debug)]
pub struct ScopeStack<T: Copy> {
    frames: Vec<Frame<T>>,
}

impl<T: Copy> Default for ScopeStack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy> ScopeStack<T> {
    #[must_use]
    pub fn new() -> Self {
        ScopeStack { frames: Vec::new() }
    }

    pub fn push(&mut self, parent: T, name: &str) {
        self.frames.push(Frame {
            parent,
            name: name.to_string(),
        });
    }

    pub fn pop(&mut self) -> Option<T> {
        let frame = self.frames.pop();
        if frame.is_none() {
            warn!("scope stack popped while empty");
        }
        frame.map(|frame| frame.parent)
    }

    /// The innermost parent. `None` at the top of a unit.
    #[must_use]
    pub fn current(&self) -> Option<T> {
        self.frames.last().map(|frame| frame.parent)
    }

    /// Names from the outermost scope to the current one.
    #[must_use]
    pub fn path(&self) -> Vec<&str> {
        self.frames.iter().map(|frame| frame.name.as_str()).collect()
    }

    /// `path()` joined with dots, skipping anonymous scopes.
    #[must_use]
    pub fn dotted_path(&self) -> String {
        self.frames
            .iter()
            .map(|frame| frame.name.as_str())
            .filter(|name| !name.is_empty())
            .collect::<Vec<_>>()
            .join(".")
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// The binder's scope stack of enclosing symbols.
pub type BindingContext = ScopeStack<crate::symbols::SymbolId>;

/// The collector's context.
pub type CollectionContext = ScopeStack<crate::decl::DeclId>;
