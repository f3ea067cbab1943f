pub mod accounts;
pub mod directory;
pub mod membership;
pub mod opportunities;
pub mod posts;
pub mod projects;
pub mod resource;
pub mod teams;

pub use directory::UserDirectory;
pub use membership::HasMembers;
pub use resource::{Resource, MAX_WRITE_ATTEMPTS};
