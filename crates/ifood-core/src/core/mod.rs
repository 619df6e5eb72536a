//! Login lifecycle, browse navigation, and the context tying them together.

pub mod context;
pub mod navigation;
pub mod session;

pub use context::SessionState;
pub use navigation::{Line, LineHandle, Navigator, Screen};
pub use session::{AuthState, Session};
