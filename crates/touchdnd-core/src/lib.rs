//! touchdnd core - drag data model
//!
//! The drag data store, the mode-gated data transfer facade handlers see
//! during event dispatch, and the effect negotiation tables.

mod effects;
mod store;
mod transfer;

pub use effects::{determine_drag_operation, determine_drop_effect};
pub use store::{DragDataStore, DragDataStoreMode, DropEffect, EffectAllowed};
pub use transfer::DataTransfer;

/// Drag data validation error
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("drag data item type string must not contain whitespace: {0:?}")]
    TypeContainsWhitespace(String),
}
