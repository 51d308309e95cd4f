pub mod result;
pub mod session;

pub use result::{ResultRecord, StoredResult};
pub use session::{GameCode, GameSession, SessionId};
