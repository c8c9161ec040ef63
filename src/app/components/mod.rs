//! Shared UI components for the dashboard.

pub mod error_alert;
pub mod form_inputs;
pub mod layout;
pub mod modal;
pub mod nav;
pub mod status_overlay;

pub use error_alert::ErrorAlert;
pub use form_inputs::{DateTimeInput, PlayModeSelect, ToggleInput};
pub use layout::Layout;
pub use modal::Modal;
pub use nav::Nav;
pub use status_overlay::StatusOverlay;
