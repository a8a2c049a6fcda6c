//! Engine Configuration Module
//!
//! Operator-tunable defaults for verification calls, loaded from TOML.
//!
//! ## Loading Order
//!
//! 1. `WELLGATE_CONFIG` environment variable (path to TOML file)
//! 2. `wellgate.toml` in the current working directory
//! 3. Built-in defaults
//!
//! ## Example
//!
//! ```toml
//! [verification]
//! strict_mode = true
//! check_pressure_ratings = true
//! check_test_dates = true
//! max_test_age_days = 365
//!
//! [toolstring]
//! max_weight_lbs = 50000.0
//!
//! [catalog]
//! path = "data/equipment.json"
//! ```
//!
//! The config is passed explicitly to the components that need it; there is
//! no process-wide instance.

mod engine_config;
pub mod validation;

pub use engine_config::*;
