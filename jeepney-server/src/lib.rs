//! Jeepney journey planner server.
//!
//! A web application that answers: "which jeepney, or which two jeepneys,
//! take me from here to there, and what will it cost?"

pub mod cache;
pub mod domain;
pub mod planner;
pub mod store;
pub mod web;
