//! UI interaction layer.
//!
//! Pure geometry, hit testing and the drag/drop state machine. The scene
//! tree is rebuilt by the view on every layout pass; nothing here knows
//! about the survey model beyond raw key bits inside `NodeKind`.

pub mod event;
pub mod geom;
pub mod id;
pub mod input;
pub mod runtime;
pub mod scene;

pub use event::{EventResult, InputEvent, KeyCode, KeyModifiers, MouseButton, MouseEventKind};
pub use geom::{Pos, Rect};
pub use id::{Id, IdPath};
pub use input::{DragPayload, UiEvent};
pub use runtime::{DragDropRules, UiRuntime, UiRuntimeOutput};
pub use scene::{Node, NodeKind, Sense, UiTree};
