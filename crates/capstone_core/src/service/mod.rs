//! Dashboard use cases.
//!
//! # Responsibility
//! - Check form input and role policy at the boundary.
//! - Keep stores and storage wiring out of host code.

pub mod dashboard_service;
pub mod validation;
