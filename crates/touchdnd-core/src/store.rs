//! Drag Data Store
//!
//! Payload items, transfer-effect negotiation fields, and the access-mode
//! gate that backs a single drag operation.

use std::collections::HashMap;

/// Access mode of the drag data store.
///
/// Set by the lifecycle controller immediately before each synthetic event
/// dispatch and reset to `Disconnected` immediately after, so handler code
/// running outside a dispatch window sees a store that silently rejects
/// reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragDataStoreMode {
    #[default]
    Disconnected,
    ReadOnly,
    ReadWrite,
    Protected,
}

/// Allowed effect set announced by the drag source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EffectAllowed {
    None,
    Copy,
    CopyLink,
    CopyMove,
    Link,
    LinkMove,
    Move,
    All,
    #[default]
    Uninitialized,
}

impl EffectAllowed {
    /// Parse the attribute-style keyword, `None` for anything illegal
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "none" => Some(Self::None),
            "copy" => Some(Self::Copy),
            "copyLink" => Some(Self::CopyLink),
            "copyMove" => Some(Self::CopyMove),
            "link" => Some(Self::Link),
            "linkMove" => Some(Self::LinkMove),
            "move" => Some(Self::Move),
            "all" => Some(Self::All),
            "uninitialized" => Some(Self::Uninitialized),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Copy => "copy",
            Self::CopyLink => "copyLink",
            Self::CopyMove => "copyMove",
            Self::Link => "link",
            Self::LinkMove => "linkMove",
            Self::Move => "move",
            Self::All => "all",
            Self::Uninitialized => "uninitialized",
        }
    }

    /// The compound keyword starts with "copy"
    pub fn allows_copy(&self) -> bool {
        matches!(self, Self::Copy | Self::CopyLink | Self::CopyMove)
    }

    /// "link" prefix or capitalized "Link" infix
    pub fn allows_link(&self) -> bool {
        matches!(self, Self::Link | Self::LinkMove | Self::CopyLink)
    }

    /// "move" prefix or capitalized "Move" infix
    pub fn allows_move(&self) -> bool {
        matches!(self, Self::Move | Self::CopyMove | Self::LinkMove)
    }
}

/// Drop effect suggested to (or chosen by) drop target handlers.
///
/// Also the type of the current drag operation the processing model
/// negotiates each iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DropEffect {
    #[default]
    None,
    Copy,
    Link,
    Move,
}

impl DropEffect {
    /// Parse the keyword form, `None` for anything illegal
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "none" => Some(Self::None),
            "copy" => Some(Self::Copy),
            "link" => Some(Self::Link),
            "move" => Some(Self::Move),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Copy => "copy",
            Self::Link => "link",
            Self::Move => "move",
        }
    }
}

/// The drag data store backing one drag operation.
///
/// Items are keyed by MIME-like type string; insertion order is preserved in
/// a parallel type list because consumers enumerate types positionally. The
/// store itself is the raw layer: mode gating is enforced by the
/// [`DataTransfer`](crate::DataTransfer) facade, never here.
#[derive(Debug, Default)]
pub struct DragDataStore {
    mode: DragDataStoreMode,
    effect_allowed: EffectAllowed,
    items: HashMap<String, String>,
    types: Vec<String>,
}

impl DragDataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> DragDataStoreMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: DragDataStoreMode) {
        self.mode = mode;
    }

    pub fn effect_allowed(&self) -> EffectAllowed {
        self.effect_allowed
    }

    pub fn set_effect_allowed(&mut self, value: EffectAllowed) {
        self.effect_allowed = value;
    }

    /// Types in insertion order
    pub fn types(&self) -> &[String] {
        &self.types
    }

    pub fn contains_type(&self, ty: &str) -> bool {
        self.types.iter().any(|t| t.eq_ignore_ascii_case(ty))
    }

    pub fn data(&self, ty: &str) -> Option<&str> {
        self.items.get(ty).map(|s| s.as_str())
    }

    /// Insert or replace an item, keeping the type order stable
    pub fn set_item(&mut self, ty: &str, data: &str) {
        if self.items.insert(ty.to_string(), data.to_string()).is_none() {
            self.types.push(ty.to_string());
        }
    }

    pub fn remove_item(&mut self, ty: &str) {
        if self.items.remove(ty).is_some() {
            self.types.retain(|t| t != ty);
        }
    }

    pub fn clear_items(&mut self) {
        self.items.clear();
        self.types.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_defaults() {
        let store = DragDataStore::new();

        assert_eq!(store.mode(), DragDataStoreMode::Disconnected);
        assert_eq!(store.effect_allowed(), EffectAllowed::Uninitialized);
        assert!(store.types().is_empty());
    }

    #[test]
    fn test_type_order_preserved() {
        let mut store = DragDataStore::new();
        store.set_item("text/plain", "a");
        store.set_item("text/html", "<b>a</b>");
        store.set_item("text/plain", "b");

        assert_eq!(store.types(), ["text/plain", "text/html"]);
        assert_eq!(store.data("text/plain"), Some("b"));

        store.remove_item("text/plain");
        assert_eq!(store.types(), ["text/html"]);
    }

    #[test]
    fn test_contains_type_case_insensitive() {
        let mut store = DragDataStore::new();
        store.set_item("text/plain", "a");

        assert!(store.contains_type("TEXT/PLAIN"));
        assert!(!store.contains_type("text/html"));
    }

    #[test]
    fn test_effect_allowed_keywords() {
        assert_eq!(EffectAllowed::parse("copyMove"), Some(EffectAllowed::CopyMove));
        assert_eq!(EffectAllowed::parse("copymove"), None);
        assert!(EffectAllowed::CopyMove.allows_move());
        assert!(EffectAllowed::CopyLink.allows_link());
        assert!(!EffectAllowed::Link.allows_copy());
    }
}
