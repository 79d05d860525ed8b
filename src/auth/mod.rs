pub mod handlers;
pub mod jwt;
pub mod session;
pub mod store;

pub use session::{Session, SessionContext};
pub use store::SessionStore;
