//! Contract between the runtime loop and the application.
//!
//! Apps see a `FrameCtx` per redraw and never touch winit's event loop or
//! the surface directly.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
