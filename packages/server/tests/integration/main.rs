mod auth;
mod common;
mod prompt;
