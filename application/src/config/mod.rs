//! Application-level configuration.
//!
//! - [`SessionParams`]: session mode, retry budget and card review settings

pub mod session_params;

pub use session_params::{DEFAULT_REVIEW_TAG, SessionParams};
