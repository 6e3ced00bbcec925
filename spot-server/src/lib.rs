//! Spot route planner server.
//!
//! A web application that answers: "I want to visit these places today,
//! in what order, and how long will it take?"

pub mod cache;
pub mod directions;
pub mod domain;
pub mod planner;
pub mod spots;
pub mod store;
pub mod web;
