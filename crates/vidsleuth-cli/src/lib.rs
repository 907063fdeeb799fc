/// VidSleuth CLI: terminal frontend.
///
/// This crate contains all presentation code: the scan session state
/// machine, filtering/sorting of results, table rendering and export.
/// Business logic lives in `vidsleuth-core`.
pub mod export;
pub mod state;
pub mod status;
pub mod table;
pub mod view;

pub use state::{AppPhase, AppState};
pub use view::Column;
