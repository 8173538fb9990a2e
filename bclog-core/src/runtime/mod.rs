mod error;
mod handle;
mod state;
mod types;

pub use error::ReloadError;
pub use handle::RuntimeHandle;
pub use state::{build_runtime_state, reload_runtime_state};
pub use types::RuntimeState;
