//! Bike + tube journey planner server.
//!
//! A web application that answers: "what is the fastest way across town
//! if I can cycle to a station, ride the tube, and cycle on from there?"

pub mod bike;
pub mod cache;
pub mod minutes;
pub mod network;
pub mod planner;
pub mod web;
