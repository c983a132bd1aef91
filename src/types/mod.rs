mod user;

pub use user::{CreatedUser, NewUser, User, UserPage, UserPatch};
