//! Graphics-configuration capability boundary.
//!
//! Visual selection is a platform concern; this crate only defines the
//! query surface. A [`ConfigTemplate`] states how strongly each
//! framebuffer attribute is wanted, a [`ConfigSource`] backend answers
//! which configurations a screen offers, and the shared scoring routine
//! keeps "best match" semantics identical across backends. A query with no
//! matching configuration is not an error; it signals unsupported and the
//! caller falls back.
//!
//! The process-wide display connection used by real backends lives in
//! [`display`].

pub mod display;
pub mod template;

pub use display::{acquire_display, display_is_open, shutdown_display, DisplayHandle};
pub use template::{AttributeRequirement, ConfigCapabilities, ConfigHandle, ConfigSource, ConfigTemplate};
