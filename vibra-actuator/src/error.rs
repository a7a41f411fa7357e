//! Erros do driver de vibração

use thiserror::Error;
use vibra_core::traits::ActuatorError as CoreActuatorError;

pub type VibratorResult<T> = Result<T, VibratorError>;

/// Falha reportada pelo rail de alimentação
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RailError {
    /// Transação de barramento falhou (I2C/PMU)
    #[error("Rail bus transaction failed: {0}")]
    Bus(String),

    /// Regulador recusou a operação
    #[error("Rail rejected request: {0}")]
    Rejected(String),
}

/// Erros do vibrador
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VibratorError {
    /// Rail não pôde ser resolvido no attach
    #[error("Device unavailable: rail '{0}' could not be acquired")]
    DeviceUnavailable(String),

    /// Operação fora do tempo de vida do attach
    #[error("Device not attached")]
    NotAttached,

    /// Probe repetido sobre device já ligado
    #[error("Device already attached to rail '{0}'")]
    AlreadyAttached(String),

    /// Falha de enable/disable
    #[error(transparent)]
    Rail(#[from] RailError),

    /// Configuração inválida
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Thread de timer ou worker não pôde ser iniciada/contatada
    #[error("Worker failure: {0}")]
    Worker(String),
}

impl From<VibratorError> for CoreActuatorError {
    fn from(err: VibratorError) -> Self {
        match err {
            VibratorError::NotAttached => CoreActuatorError::NotAttached,
            VibratorError::DeviceUnavailable(rail) => {
                CoreActuatorError::Fault(format!("Rail '{}' unavailable", rail))
            }
            VibratorError::AlreadyAttached(rail) => {
                CoreActuatorError::CommandFailed(format!("Already attached to '{}'", rail))
            }
            VibratorError::Rail(e) => CoreActuatorError::Fault(e.to_string()),
            VibratorError::InvalidConfig(msg) => {
                CoreActuatorError::CommandFailed(format!("Invalid config: {}", msg))
            }
            VibratorError::Worker(msg) => CoreActuatorError::Fault(format!("Worker: {}", msg)),
        }
    }
}
