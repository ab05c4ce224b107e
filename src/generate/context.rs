//! Immutable traversal context.
//!
//! Entering a `list` extends the context rather than mutating it, so the
//! deeper level is visible only to that list's descendants and sibling lists
//! never inherit each other's indentation or numbering reference.

/// List state carried down the walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkContext {
    /// Current list nesting depth; `None` outside any list.
    pub list_level: Option<u8>,
    /// Numbering instance the enclosing list renders with.
    pub list_reference: Option<u32>,
}

impl WalkContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// The context for the children of a list rendered with `num_id`.
    pub fn enter_list(&self, num_id: u32) -> Self {
        Self {
            list_level: Some(match self.list_level {
                Some(level) => level.saturating_add(1).min(8),
                None => 0,
            }),
            list_reference: Some(num_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nesting_extends_not_mutates() {
        let outer = WalkContext::new();
        let first = outer.enter_list(1);
        let second = first.enter_list(1);

        assert_eq!(first.list_level, Some(0));
        assert_eq!(second.list_level, Some(1));
        // The outer context is untouched.
        assert_eq!(outer.list_level, None);
    }

    #[test]
    fn test_sibling_lists_are_isolated() {
        let outer = WalkContext::new();
        let first = outer.enter_list(1);
        let sibling = outer.enter_list(2);

        assert_eq!(first.list_reference, Some(1));
        assert_eq!(sibling.list_level, Some(0));
        assert_eq!(sibling.list_reference, Some(2));
    }

    #[test]
    fn test_level_caps_at_nine_levels() {
        let mut ctx = WalkContext::new();
        for _ in 0..12 {
            ctx = ctx.enter_list(1);
        }
        assert_eq!(ctx.list_level, Some(8));
    }
}
