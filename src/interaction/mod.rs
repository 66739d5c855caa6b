//! Pointer interaction: dragging the card around.

pub mod drag;

pub use drag::{
    begin_drag, begin_drag_at, end_drag, pointer_world_point, update_drag, DragController,
    Dragging, GRAB_DEPTH,
};
