//! Re-exports de uso comum
//!
//! ```ignore
//! use vibra_core::prelude::*;
//! ```

pub use crate::config::{env_or, lookup_or};
pub use crate::traits::{Actuator, ActuatorError, ActuatorStatus, Component};
