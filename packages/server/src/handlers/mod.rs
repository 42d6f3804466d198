pub mod admin;
pub mod auth;
pub mod prompt;
pub mod vote;
