//! # 🧩 vibra-core — Abstrações do driver de vibração
//!
//! Núcleo compartilhado pelos crates de atuador. Contém apenas o que não
//! depende de hardware:
//!
//! | Módulo | Conteúdo |
//! |:-------|:---------|
//! | [`traits`] | [`Component`], [`Actuator`], [`ActuatorStatus`], [`ActuatorError`] |
//! | [`config`] | Carregamento de `.env` e leitura tipada de variáveis |
//! | [`logging`] | Inicialização do `tracing-subscriber` |
//!
//! ## Princípio de Design
//!
//! > *"Trait no core, implementação no módulo."*
//!
//! O driver concreto (rail, timer, worker de desligamento) vive em
//! `vibra-actuator`.

pub mod config;
pub mod logging;
pub mod traits;
pub mod prelude;

pub use traits::{Actuator, ActuatorError, ActuatorStatus, Component};
