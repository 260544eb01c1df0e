pub mod groups;
pub mod ledger;
pub mod users;

pub use groups::GroupService;
pub use users::{ProfilePictureChange, Session, UserService};
