//! # 🎯 Traits — Abstrações de componentes e atuadores
//!
//! Traits base implementados pelos drivers concretos. Aqui só existem
//! contratos; o comportamento vive nos crates específicos (`vibra-actuator`).

use std::fmt::Debug;

// ═══════════════════════════════════════════════════════════════════════════════
// TRAIT BASE — Todo componente
// ═══════════════════════════════════════════════════════════════════════════════

/// Trait base para qualquer componente ligado a um host.
///
/// # Exemplo
///
/// ```ignore
/// use vibra_core::traits::Component;
///
/// #[derive(Debug)]
/// struct Led;
///
/// impl Component for Led {
///     fn name(&self) -> &str { "led" }
/// }
/// ```
pub trait Component: Send + Sync + Debug {
    /// Nome único do componente (para logs e debug)
    fn name(&self) -> &str;

    /// Versão do componente (para compatibilidade)
    fn version(&self) -> &str {
        "2026.1.16"
    }

    /// Componente está pronto para uso?
    fn is_ready(&self) -> bool {
        true
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ATUADORES
// ═══════════════════════════════════════════════════════════════════════════════

/// Erro de atuador
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActuatorError {
    #[error("Command failed: {0}")]
    CommandFailed(String),
    #[error("Actuator busy")]
    Busy,
    #[error("Actuator fault: {0}")]
    Fault(String),
    #[error("Out of range: {0}")]
    OutOfRange(String),
    #[error("Actuator not attached")]
    NotAttached,
}

/// Status de atuador
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ActuatorStatus {
    /// Pronto para receber comandos
    Ready,
    /// Executando comando
    Busy,
    /// Em erro (precisa reset)
    Fault,
    /// Desligado
    Off,
}

/// Trait para atuadores que executam ações físicas.
///
/// # Exemplo
///
/// ```ignore
/// use vibra_core::traits::{Actuator, ActuatorError, ActuatorStatus};
///
/// impl Actuator for Buzzer {
///     type Command = u32;  // Duração em ms
///
///     fn send(&mut self, ms: u32) -> Result<(), ActuatorError> {
///         self.beep(ms);
///         Ok(())
///     }
///
///     fn status(&self) -> ActuatorStatus {
///         ActuatorStatus::Ready
///     }
/// }
/// ```
pub trait Actuator: Component {
    /// Tipo de comando aceito
    type Command;

    /// Envia comando para o atuador
    fn send(&mut self, cmd: Self::Command) -> Result<(), ActuatorError>;

    /// Status atual do atuador
    fn status(&self) -> ActuatorStatus;

    /// Para imediatamente (emergência)
    fn emergency_stop(&mut self) -> Result<(), ActuatorError> {
        Ok(())
    }

    /// Reseta atuador após falha
    fn reset(&mut self) -> Result<(), ActuatorError> {
        Ok(())
    }
}
