//! Content discovery for Linkgate.
//!
//! The gateway does not host content. It asks an external source for
//! search results and item bodies, then turns the bodies' download links
//! into opaque references.
//!
//! - [`ContentSource`]: the seam the gateway calls through
//! - [`WordPressSource`]: the production source, a WordPress REST API
//! - [`text`]: title cleanup applied to everything the source returns

mod config;
mod error;
mod source;
pub mod text;
mod wordpress;

pub use config::ContentConfig;
pub use error::ContentError;
pub use source::{ContentSource, RawContent};
pub use wordpress::WordPressSource;
