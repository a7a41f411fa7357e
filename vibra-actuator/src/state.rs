//! Estado do atuador (armed/deadline/geração)

use std::time::{Duration, Instant};
use serde::{Deserialize, Serialize};
use crate::types::Phase;

/// Deadline armado, identificado pela geração que o criou
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArmToken {
    pub deadline: Instant,
    pub generation: u64,
}

/// Estado interno do vibrador.
///
/// `armed`, `deadline` e `generation` só mudam juntos, sob o mesmo lock.
/// Toda transição incrementa `generation`; jobs de desligamento com geração
/// antiga são descartados.
#[derive(Debug, Clone)]
pub struct ActuatorState {
    /// Motor deveria estar ligado?
    pub armed: bool,
    /// Último deadline registrado (mantido após desarmar)
    pub deadline: Option<Instant>,
    /// Geração do último arm/disarm
    pub generation: u64,
    /// Última falha de rail não resolvida
    pub last_fault: Option<String>,
    /// Total de ativações aceitas
    pub activations: u64,
    /// Desligamentos concluídos pelo worker
    pub shutdowns: u64,
    /// Jobs descartados por geração antiga
    pub stale_jobs: u64,
    /// Falhas de enable/disable
    pub rail_faults: u64,
}

impl ActuatorState {
    /// Cria novo estado (IDLE)
    pub fn new() -> Self {
        Self {
            armed: false,
            deadline: None,
            generation: 0,
            last_fault: None,
            activations: 0,
            shutdowns: 0,
            stale_jobs: 0,
            rail_faults: 0,
        }
    }

    /// Arma (ou rearma) com deadline `now + timeout`
    pub fn arm(&mut self, now: Instant, timeout: Duration) -> ArmToken {
        self.generation += 1;
        self.armed = true;
        self.deadline = Some(now + timeout);
        self.activations += 1;
        self.last_fault = None;
        ArmToken {
            deadline: now + timeout,
            generation: self.generation,
        }
    }

    /// Desarma imediatamente (caminho do timeout zero)
    pub fn disarm(&mut self) {
        self.generation += 1;
        self.armed = false;
    }

    /// Job ainda corresponde ao arm atual?
    pub fn is_current(&self, generation: u64) -> bool {
        self.armed && self.generation == generation
    }

    /// Conclui o desligamento de `generation`. Retorna `false` se o job é antigo.
    pub fn complete_shutdown(&mut self, generation: u64) -> bool {
        if !self.is_current(generation) {
            self.stale_jobs += 1;
            return false;
        }
        self.armed = false;
        self.shutdowns += 1;
        true
    }

    /// Registra falha de rail
    pub fn record_fault(&mut self, msg: impl Into<String>) {
        self.rail_faults += 1;
        self.last_fault = Some(msg.into());
    }

    /// `now - deadline` em ms (negativo enquanto o deadline está no futuro).
    ///
    /// Sem deadline registrado retorna 0.
    pub fn elapsed_since_deadline_ms(&self, now: Instant) -> i64 {
        let Some(deadline) = self.deadline else {
            return 0;
        };
        match now.checked_duration_since(deadline) {
            Some(past) => past.as_millis() as i64,
            None => -((deadline - now).as_millis() as i64),
        }
    }

    /// Fase atual, dado a última geração disparada pelo timer
    pub fn phase(&self, fired_generation: u64) -> Phase {
        if !self.armed {
            Phase::Idle
        } else if fired_generation == self.generation {
            Phase::ShuttingDown
        } else {
            Phase::Active
        }
    }
}

impl Default for ActuatorState {
    fn default() -> Self {
        Self::new()
    }
}

/// Visão serializável do vibrador
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub name: String,
    pub rail_id: String,
    pub phase: Phase,
    pub armed: bool,
    pub rail_enabled: bool,
    pub elapsed_since_deadline_ms: i64,
    pub generation: u64,
    pub activations: u64,
    pub expirations: u64,
    pub shutdowns: u64,
    pub stale_jobs: u64,
    pub rail_faults: u64,
    pub last_fault: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_new_is_idle() {
        let state = ActuatorState::new();
        assert!(!state.armed);
        assert_eq!(state.phase(0), Phase::Idle);
        assert_eq!(state.elapsed_since_deadline_ms(Instant::now()), 0);
    }

    #[test]
    fn test_arm_sets_deadline() {
        let mut state = ActuatorState::new();
        let now = Instant::now();
        let token = state.arm(now, Duration::from_millis(300));
        assert!(state.armed);
        assert_eq!(token.deadline, now + Duration::from_millis(300));
        assert_eq!(state.deadline, Some(token.deadline));
        assert_eq!(state.phase(0), Phase::Active);
    }

    #[test]
    fn test_rearm_supersedes() {
        let mut state = ActuatorState::new();
        let now = Instant::now();
        let first = state.arm(now, Duration::from_millis(300));
        let second = state.arm(now, Duration::from_millis(200));
        assert_ne!(first.generation, second.generation);
        assert!(!state.is_current(first.generation));
        assert!(state.is_current(second.generation));
    }

    #[test]
    fn test_complete_shutdown_once() {
        let mut state = ActuatorState::new();
        let token = state.arm(Instant::now(), Duration::from_millis(170));
        assert_eq!(state.phase(token.generation), Phase::ShuttingDown);

        assert!(state.complete_shutdown(token.generation));
        assert!(!state.armed);
        assert!(!state.complete_shutdown(token.generation));
        assert_eq!(state.shutdowns, 1);
        assert_eq!(state.stale_jobs, 1);
    }

    #[test]
    fn test_disarm_invalidates_pending_job() {
        let mut state = ActuatorState::new();
        let token = state.arm(Instant::now(), Duration::from_millis(170));
        state.disarm();
        assert!(!state.complete_shutdown(token.generation));
        assert_eq!(state.phase(token.generation), Phase::Idle);
    }

    #[test]
    fn test_elapsed_sign() {
        let mut state = ActuatorState::new();
        let now = Instant::now();
        state.arm(now, Duration::from_millis(200));
        assert_eq!(state.elapsed_since_deadline_ms(now), -200);
        assert_eq!(
            state.elapsed_since_deadline_ms(now + Duration::from_millis(250)),
            50
        );
    }

    #[test]
    fn test_record_fault() {
        let mut state = ActuatorState::new();
        state.record_fault("bus");
        assert_eq!(state.rail_faults, 1);
        assert_eq!(state.last_fault.as_deref(), Some("bus"));
        state.arm(Instant::now(), Duration::from_millis(200));
        assert!(state.last_fault.is_none());
    }
}
