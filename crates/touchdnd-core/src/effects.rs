//! Effect negotiation
//!
//! The two lookup tables of the drag-and-drop processing model: the drop
//! effect suggested to a target before `dragenter`/`dragover`, and the drag
//! operation resolved from the transfer state after a dispatch.

use crate::store::{DropEffect, EffectAllowed};
use crate::transfer::DataTransfer;

/// Suggest a drop effect for the allowed-effect set of the drag source.
///
/// `anchor_like` marks a source element that behaves like a link (an `a`
/// element carrying an `href`), which biases an uninitialized source towards
/// "link"; everything else defaults towards "copy".
pub fn determine_drop_effect(effect_allowed: EffectAllowed, anchor_like: bool) -> DropEffect {
    match effect_allowed {
        EffectAllowed::None => DropEffect::None,
        EffectAllowed::Copy | EffectAllowed::CopyLink | EffectAllowed::CopyMove | EffectAllowed::All => {
            DropEffect::Copy
        }
        EffectAllowed::Link | EffectAllowed::LinkMove => DropEffect::Link,
        EffectAllowed::Move => DropEffect::Move,
        EffectAllowed::Uninitialized if anchor_like => DropEffect::Link,
        EffectAllowed::Uninitialized => DropEffect::Copy,
    }
}

/// Resolve the current drag operation from the transfer state as it stood
/// after an event dispatch finished.
///
/// An uninitialized or unrestricted allowance passes the handler's drop
/// effect through unchanged; otherwise the drop effect only survives when
/// the allowance's compound keyword covers it.
pub fn determine_drag_operation(transfer: &DataTransfer) -> DropEffect {
    let allowed = transfer.effect_allowed();
    let effect = transfer.drop_effect();

    if matches!(allowed, EffectAllowed::Uninitialized | EffectAllowed::All) {
        return effect;
    }

    let compatible = match effect {
        DropEffect::None => false,
        DropEffect::Copy => allowed.allows_copy(),
        DropEffect::Link => allowed.allows_link(),
        DropEffect::Move => allowed.allows_move(),
    };

    if compatible { effect } else { DropEffect::None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{DragDataStore, DragDataStoreMode};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn transfer(allowed: EffectAllowed, effect: DropEffect) -> DataTransfer {
        let store = Rc::new(RefCell::new(DragDataStore::new()));
        store.borrow_mut().set_effect_allowed(allowed);
        store.borrow_mut().set_mode(DragDataStoreMode::Protected);
        let mut t = DataTransfer::new(store);
        t.set_drop_effect(effect);
        t
    }

    #[test]
    fn test_determine_drop_effect_table() {
        assert_eq!(determine_drop_effect(EffectAllowed::None, false), DropEffect::None);
        assert_eq!(determine_drop_effect(EffectAllowed::All, false), DropEffect::Copy);
        assert_eq!(determine_drop_effect(EffectAllowed::CopyLink, false), DropEffect::Copy);
        assert_eq!(determine_drop_effect(EffectAllowed::LinkMove, false), DropEffect::Link);
        assert_eq!(determine_drop_effect(EffectAllowed::Move, false), DropEffect::Move);
        assert_eq!(determine_drop_effect(EffectAllowed::Uninitialized, true), DropEffect::Link);
        assert_eq!(determine_drop_effect(EffectAllowed::Uninitialized, false), DropEffect::Copy);
    }

    #[test]
    fn test_determine_drag_operation_compatible() {
        let t = transfer(EffectAllowed::CopyMove, DropEffect::Move);
        assert_eq!(determine_drag_operation(&t), DropEffect::Move);

        let t = transfer(EffectAllowed::CopyLink, DropEffect::Link);
        assert_eq!(determine_drag_operation(&t), DropEffect::Link);
    }

    #[test]
    fn test_determine_drag_operation_incompatible() {
        let t = transfer(EffectAllowed::Copy, DropEffect::Move);
        assert_eq!(determine_drag_operation(&t), DropEffect::None);

        let t = transfer(EffectAllowed::Move, DropEffect::Copy);
        assert_eq!(determine_drag_operation(&t), DropEffect::None);
    }

    #[test]
    fn test_determine_drag_operation_unrestricted() {
        let t = transfer(EffectAllowed::Uninitialized, DropEffect::Move);
        assert_eq!(determine_drag_operation(&t), DropEffect::Move);

        let t = transfer(EffectAllowed::All, DropEffect::Link);
        assert_eq!(determine_drag_operation(&t), DropEffect::Link);
    }
}
