//! Headless driver for the Fruitfall simulation: a scripted frontend and a
//! fixed-timestep session loop.

pub mod frontend;
pub mod session;
