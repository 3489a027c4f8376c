pub mod log_window;
pub mod signature_dialog;
pub mod surface;

pub use log_window::show_log_window;
pub use signature_dialog::{DialogOutcome, SignatureDialog};
pub use surface::{PageTexture, SurfaceState, publish_layout, show_surface};
