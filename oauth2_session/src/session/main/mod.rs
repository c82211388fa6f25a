mod cookie;
mod session;

pub use session::{CookieDirective, Session, SessionManager};
