pub mod canvas_layer;
pub mod clock;
pub mod display_context;
pub mod gpu_context;
pub mod layer;
pub mod resize;
pub mod run_loop;
pub mod timer;

pub use canvas_layer::{Blob, BlobField, Canvas, DrawOp};
pub use clock::{FrameClock, ManualClock, SystemClock, TimeSource};
pub use display_context::DisplayContext;
pub use gpu_context::GpuContext;
pub use layer::{LayerLogic, LayerOutput, TimedLayer};
pub use resize::{ResizeAdapter, Viewport, MAX_PIXEL_RATIO};
pub use run_loop::{CancelToken, RunLoop};
pub use timer::{FixedHz, FpsCounter, Throttled};
