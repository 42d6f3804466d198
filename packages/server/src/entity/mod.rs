pub mod prompt;
pub mod user;
pub mod vote;
