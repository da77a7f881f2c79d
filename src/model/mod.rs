pub mod admin;
pub mod poll;
pub mod vote;
