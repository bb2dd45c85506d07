pub mod correlator;
pub mod events;
pub mod notify;

pub use correlator::{CaptureCorrelator, CaptureOutcome, CaptureStats};
pub use events::{BodyPhaseEvent, CaptureEvent, HeaderEntry, HeaderPhaseEvent};
pub use notify::{CaptureNotice, CaptureNotifier};
