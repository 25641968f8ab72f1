//! Form state for the session editor: the field store, the synchronization
//! controller that keeps it consistent, and the page layout it is bound to.

pub mod controller;
pub mod dates;
pub mod destinations;
pub mod document;
pub mod session;
pub mod visibility;

pub use controller::{FormEvent, SyncController};
pub use document::{Field, FieldKind, FieldStore, FormDocument, FormRow};
pub use visibility::MessageType;
