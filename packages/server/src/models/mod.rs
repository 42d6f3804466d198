pub mod auth;
pub mod category;
pub mod prompt;
pub mod vote;
