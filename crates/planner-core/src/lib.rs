//! Planner Core: domain models, repository traits and the rules that
//! decide who sees and edits which events.
//!
//! This crate has no storage dependency. Services are generic over the
//! repository traits in [`repository`] so the database crate can supply
//! the implementations.

pub mod access;
pub mod dashboard;
pub mod error;
pub mod models;
pub mod planner;
pub mod repository;

pub use error::{PlannerError, PlannerResult};
