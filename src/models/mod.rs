//! Data models

pub mod risk;
pub mod notification;
pub mod asset;
pub mod session;

pub use risk::*;
pub use notification::*;
pub use asset::*;
pub use session::*;
