pub mod comment;
pub mod errors;
pub mod shared;
pub mod vote;
