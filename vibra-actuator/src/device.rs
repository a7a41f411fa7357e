//! Binding do vibrador com a plataforma (probe/remove)

use tracing::{info, warn};
use vibra_core::traits::{Actuator, ActuatorError, ActuatorStatus, Component};
use crate::config::VibratorConfig;
use crate::controller::Vibrator;
use crate::error::{VibratorError, VibratorResult};
use crate::rail::RailProvider;
use crate::state::StateSnapshot;
use crate::types::{Phase, TimeoutMs};

/// Device `vibrator` como visto pelo host.
///
/// Fora do intervalo probe → remove toda operação falha com
/// [`VibratorError::NotAttached`].
#[derive(Debug)]
pub struct VibratorDevice {
    config: VibratorConfig,
    attached: Option<Vibrator>,
}

impl VibratorDevice {
    /// Cria device com configuração padrão (não ligado)
    pub fn new() -> Self {
        Self::with_config(VibratorConfig::default())
    }

    /// Cria com configuração específica
    pub fn with_config(config: VibratorConfig) -> Self {
        Self {
            config,
            attached: None,
        }
    }

    /// Cria a partir de `VIBRATOR_*` no ambiente
    pub fn from_env() -> Self {
        Self::with_config(VibratorConfig::from_env())
    }

    /// Liga o device ao rail `rail_id`
    pub fn probe(&mut self, provider: &dyn RailProvider, rail_id: &str) -> VibratorResult<()> {
        if let Some(vib) = &self.attached {
            return Err(VibratorError::AlreadyAttached(vib.rail_id().to_string()));
        }

        let mut config = self.config.clone();
        config.rail_id = rail_id.to_string();
        let vib = Vibrator::attach(provider, config)?;

        info!(device = %self.config.name, "ss vibrator probe");
        self.attached = Some(vib);
        Ok(())
    }

    /// Probe com o rail da configuração (padrão "hv4")
    pub fn probe_default(&mut self, provider: &dyn RailProvider) -> VibratorResult<()> {
        let rail_id = self.config.rail_id.clone();
        self.probe(provider, &rail_id)
    }

    /// Desliga o motor e libera o rail
    pub fn remove(&mut self) -> VibratorResult<()> {
        match self.attached.take() {
            Some(vib) => vib.detach(),
            None => {
                warn!(device = %self.config.name, "remove on detached device");
                Err(VibratorError::NotAttached)
            }
        }
    }

    /// Device ligado?
    pub fn is_attached(&self) -> bool {
        self.attached.is_some()
    }

    /// Operação `enable` do host (ms; 0 desliga)
    pub fn activate(&self, timeout_ms: i64) -> VibratorResult<()> {
        self.vibrator()?.activate(timeout_ms)
    }

    /// Operação `get_time` do host
    pub fn remaining_time(&self) -> VibratorResult<i64> {
        Ok(self.vibrator()?.remaining_time())
    }

    /// Fase atual
    pub fn phase(&self) -> VibratorResult<Phase> {
        Ok(self.vibrator()?.phase())
    }

    /// Visão serializável do estado
    pub fn snapshot(&self) -> VibratorResult<StateSnapshot> {
        Ok(self.vibrator()?.snapshot())
    }

    /// Configuração do device
    pub fn config(&self) -> &VibratorConfig {
        &self.config
    }

    /// Controlador ligado
    pub fn vibrator(&self) -> VibratorResult<&Vibrator> {
        self.attached.as_ref().ok_or(VibratorError::NotAttached)
    }
}

impl Default for VibratorDevice {
    fn default() -> Self {
        Self::new()
    }
}

/// Implementação do trait Actuator
impl Actuator for VibratorDevice {
    type Command = TimeoutMs;

    fn send(&mut self, cmd: Self::Command) -> Result<(), ActuatorError> {
        self.activate(cmd.0).map_err(|e| e.into())
    }

    fn status(&self) -> ActuatorStatus {
        let Some(vib) = &self.attached else {
            return ActuatorStatus::Off;
        };
        if vib.fault().is_some() {
            return ActuatorStatus::Fault;
        }
        match vib.phase() {
            Phase::Idle => ActuatorStatus::Ready,
            Phase::Active | Phase::ShuttingDown => ActuatorStatus::Busy,
        }
    }

    fn emergency_stop(&mut self) -> Result<(), ActuatorError> {
        self.activate(0).map_err(|e| e.into())
    }

    fn reset(&mut self) -> Result<(), ActuatorError> {
        let vib = self.vibrator()?;
        vib.activate(0)?;
        vib.clear_fault();
        Ok(())
    }
}

/// Implementação do trait Component
impl Component for VibratorDevice {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn version(&self) -> &str {
        "2026.1.16"
    }

    fn is_ready(&self) -> bool {
        self.attached
            .as_ref()
            .is_some_and(|vib| vib.fault().is_none())
    }
}
