//! Query and subscription handlers

pub mod health;
pub mod impact;
pub mod pairs;
pub mod snapshot;
pub mod ws;
