//! # 📳 vibra-actuator — Vibrador com timeout
//!
//! Driver de motor de vibração alimentado por um rail chaveado. O host pede
//! "vibre por N ms"; o driver liga o rail, arma um deadline e, quando ele
//! expira, desliga o rail numa thread de trabalho. O motor nunca fica ligado
//! indefinidamente.
//!
//! ## Arquitetura
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │  VibratorDevice  (probe / remove / Actuator trait)   │
//! │  ┌────────────────────────────────────────────────┐  │
//! │  │ Vibrator  activate(ms) · remaining_time()      │  │
//! │  │   ├─ ActuatorState  (armed, deadline, geração) │  │
//! │  │   └─ RailHandle ──────────────► PowerRail      │  │
//! │  └───────┬────────────────────────────▲───────────┘  │
//! │      arm │                            │ disable      │
//! │  ┌───────▼──────────┐  ShutdownJob ┌──┴───────────┐  │
//! │  │ TimeoutScheduler ├─────────────►│ShutdownWorker│  │
//! │  │  (thread timer)  │  (crossbeam) │  (thread)    │  │
//! │  └──────────────────┘              └──────────────┘  │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! ## Máquina de estados
//!
//! | De | Evento | Para |
//! |:---|:-------|:-----|
//! | IDLE | `activate(t > 0)` | ACTIVE |
//! | ACTIVE | `activate(t > 0)` | ACTIVE (deadline substituído) |
//! | ACTIVE | `activate(0)` | IDLE |
//! | ACTIVE | deadline expira | SHUTTING_DOWN |
//! | SHUTTING_DOWN | worker conclui | IDLE |
//!
//! ## Política de timeout
//!
//! - `t == 0` desliga imediatamente
//! - `t > 150 ms` é respeitado literalmente
//! - qualquer outro valor vira 170 ms
//! - não há limite superior (500 ms é só nominal)
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use vibra_actuator::{MockRailProvider, VibratorDevice};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let (provider, rail) = MockRailProvider::with_rail("hv4");
//!
//! let mut dev = VibratorDevice::new();
//! dev.probe(&provider, "hv4")?;
//!
//! dev.activate(200)?;
//! assert!(rail.is_enabled());
//!
//! dev.activate(0)?;
//! assert!(!rail.is_enabled());
//!
//! dev.remove()?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod controller;
pub mod device;
pub mod error;
pub mod rail;
pub mod scheduler;
pub mod shutdown;
pub mod state;
pub mod types;

pub use config::VibratorConfig;
pub use controller::Vibrator;
pub use device::VibratorDevice;
pub use error::{RailError, VibratorError, VibratorResult};
pub use rail::{MockRail, MockRailProvider, PowerRail, RailHandle, RailProvider};
pub use scheduler::TimeoutScheduler;
pub use shutdown::{ShutdownJob, ShutdownOutcome, ShutdownWorker};
pub use state::{ActuatorState, ArmToken, StateSnapshot};
pub use types::{
    Phase, Request, TimeoutMs, TimeoutPolicy, DEFAULT_RAIL_ID, DEFAULT_TIMEOUT_MS, DEVICE_NAME,
    MAX_TIMEOUT_MS, MIN_TIMEOUT_MS,
};
