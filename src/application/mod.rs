pub mod comments;
pub mod reactions;
pub mod threads;
