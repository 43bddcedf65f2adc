//! Console form engine: key batching, resumable line editing, per-field
//! validation and the focus-navigation coordinator.

pub mod batcher;
pub mod buffer;
pub mod coordinator;
pub mod editor;
pub mod key;
pub mod member;
pub mod render;
pub mod session;
pub mod surface;
pub mod validation;

pub use coordinator::{FieldDescriptor, FormCoordinator, FormDescriptor, FormFlow, FormResult};
pub use key::{parse_key_script, Key, KeyEvent};
pub use member::{edit_record, MemberForm};
pub use surface::{CrosstermSurface, ScriptedSurface, TerminalSurface};
pub use validation::{FieldKind, FieldValue, ValidationError};
