pub mod presenter;
pub mod session;
pub mod tracing;

pub use presenter::{CapturingPresenter, Output};
pub use session::{FIXTURE_YEAR, TestSession, fixture_path};
pub use tracing::{CapturedEvent, capture_tracing};
