mod badge_set;
mod credential;
mod session;
mod vocabulary;

pub use badge_set::BadgeSet;
pub use credential::{Credential, SessionContext};
pub use session::{SessionRecord, UserRecord};
pub use vocabulary::{Archetype, Badge, UnknownLabel};
