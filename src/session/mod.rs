//! In-memory login sessions: the expiring session table and the cookie that carries its key.

pub mod clock;
pub mod cookie;
pub mod store;

pub use cookie::{session_cookie, session_id_from_header};
pub use store::{spawn_sweeper, SessionStore};
