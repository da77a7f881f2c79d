pub mod api;
pub mod config;
pub mod device;
pub mod geo;
pub mod model;
pub mod results;
pub mod session;
pub mod vote_flow;
