//! Controlador do vibrador (fachada `activate` / `remaining_time`)

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;
use crossbeam_channel::unbounded;
use tracing::{debug, error, info, warn};
use crate::config::VibratorConfig;
use crate::error::{VibratorError, VibratorResult};
use crate::rail::{RailHandle, RailProvider};
use crate::scheduler::{ExpiryCounters, TimeoutScheduler};
use crate::shutdown::ShutdownWorker;
use crate::state::{ActuatorState, StateSnapshot};
use crate::types::{Phase, Request, TimeoutMs, TimeoutPolicy};

/// Trava um mutex, recuperando o conteúdo se outra thread entrou em pânico
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Estado compartilhado entre host, timer e worker.
///
/// Ordem de locks: `rail` antes de `state`.
#[derive(Debug)]
pub struct Shared {
    pub(crate) state: Mutex<ActuatorState>,
    pub(crate) rail: Mutex<Option<RailHandle>>,
    pub(crate) expiry: Arc<ExpiryCounters>,
}

impl Shared {
    pub(crate) fn new(rail: RailHandle) -> Self {
        Self {
            state: Mutex::new(ActuatorState::new()),
            rail: Mutex::new(Some(rail)),
            expiry: Arc::new(ExpiryCounters::default()),
        }
    }
}

/// Vibrador ligado a um rail.
///
/// Existe apenas entre attach e detach; descartar o valor desliga o motor e
/// encerra as threads.
pub struct Vibrator {
    config: VibratorConfig,
    policy: TimeoutPolicy,
    rail_id: String,
    shared: Arc<Shared>,
    scheduler: TimeoutScheduler,
    worker: ShutdownWorker,
    detached: bool,
}

impl std::fmt::Debug for Vibrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vibrator")
            .field("name", &self.config.name)
            .field("rail", &self.rail_id)
            .field("phase", &self.phase())
            .finish()
    }
}

impl Vibrator {
    /// Resolve o rail e inicia timer e worker
    pub fn attach(provider: &dyn RailProvider, config: VibratorConfig) -> VibratorResult<Self> {
        config.validate()?;
        info!(device = %config.name, "Vibrator vcc={}", config.rail_id);

        let Some(rail) = provider.acquire(&config.rail_id) else {
            warn!(device = %config.name, rail = %config.rail_id, "failed to get regulator");
            return Err(VibratorError::DeviceUnavailable(config.rail_id.clone()));
        };
        let shared = Arc::new(Shared::new(RailHandle::new(rail)));

        let (jobs_tx, jobs_rx) = unbounded();
        let spawned = ShutdownWorker::spawn(&config.name, jobs_rx, Arc::clone(&shared)).and_then(
            |worker| {
                TimeoutScheduler::spawn(&config.name, jobs_tx, Arc::clone(&shared.expiry))
                    .map(|scheduler| (worker, scheduler))
            },
        );
        let (worker, scheduler) = match spawned {
            Ok(pair) => pair,
            Err(e) => {
                if let Some(handle) = lock(&shared.rail).take() {
                    handle.release();
                }
                return Err(e);
            }
        };

        info!(device = %config.name, "vibrator attached");
        Ok(Self {
            policy: config.policy(),
            rail_id: config.rail_id.clone(),
            config,
            shared,
            scheduler,
            worker,
            detached: false,
        })
    }

    /// Liga o motor por `timeout_ms` ms, ou desliga se `timeout == 0`.
    ///
    /// Pedidos `<= min_timeout_ms` usam `default_timeout_ms`; não há limite
    /// superior.
    pub fn activate(&self, timeout_ms: i64) -> VibratorResult<()> {
        let requested = TimeoutMs::new(timeout_ms);
        let mut rail = lock(&self.shared.rail);
        let handle = rail.as_mut().ok_or(VibratorError::NotAttached)?;

        match self.policy.resolve(requested) {
            Request::Off => {
                if let Err(e) = handle.switch(false) {
                    error!(error = %e, "failed to switch rail off");
                    lock(&self.shared.state).record_fault(e.to_string());
                    return Err(e.into());
                }
                lock(&self.shared.state).disarm();
                self.scheduler.cancel()
            }
            Request::On(timeout) => {
                if let Err(e) = handle.switch(true) {
                    error!(error = %e, "failed to switch rail on");
                    lock(&self.shared.state).record_fault(e.to_string());
                    return Err(e.into());
                }
                if self.policy.exceeds_max(requested) {
                    debug!(
                        requested = requested.0,
                        max = self.policy.max_ms,
                        "timeout above nominal maximum, not clamped"
                    );
                }
                info!("Vibrator timeout = {} ms", timeout.as_millis());

                let token = lock(&self.shared.state).arm(Instant::now(), timeout);
                if let Err(e) = self.scheduler.arm(token) {
                    error!(error = %e, "no timer to bound activation, switching rail off");
                    lock(&self.shared.state).disarm();
                    if let Err(rail_err) = handle.switch(false) {
                        lock(&self.shared.state).record_fault(rail_err.to_string());
                    }
                    return Err(e);
                }
                Ok(())
            }
        }
    }

    /// `now - deadline` em ms, negativo enquanto o deadline está no futuro.
    ///
    /// Valor diagnóstico, não contagem regressiva. Sem efeito colateral além
    /// do log.
    pub fn remaining_time(&self) -> i64 {
        let ms = lock(&self.shared.state).elapsed_since_deadline_ms(Instant::now());
        info!("Vibrator : remaining time : {}ms", ms);
        ms
    }

    /// Fase atual da máquina de estados
    pub fn phase(&self) -> Phase {
        let fired = self.shared.expiry.fired_generation();
        lock(&self.shared.state).phase(fired)
    }

    /// Motor armado?
    pub fn is_armed(&self) -> bool {
        lock(&self.shared.state).armed
    }

    /// Deadline registrado (o último, mesmo se desarmado)
    pub fn deadline(&self) -> Option<Instant> {
        lock(&self.shared.state).deadline
    }

    /// Estado físico do rail
    pub fn rail_enabled(&self) -> bool {
        lock(&self.shared.rail)
            .as_ref()
            .map(RailHandle::is_enabled)
            .unwrap_or(false)
    }

    /// Última falha de rail não resolvida
    pub fn fault(&self) -> Option<String> {
        lock(&self.shared.state).last_fault.clone()
    }

    /// Esquece a falha registrada
    pub fn clear_fault(&self) {
        lock(&self.shared.state).last_fault = None;
    }

    /// Configuração em uso
    pub fn config(&self) -> &VibratorConfig {
        &self.config
    }

    /// Identificador do rail
    pub fn rail_id(&self) -> &str {
        &self.rail_id
    }

    /// Visão serializável do estado
    pub fn snapshot(&self) -> StateSnapshot {
        let rail_enabled = self.rail_enabled();
        let fired = self.shared.expiry.fired_generation();
        let expirations = self.shared.expiry.expirations();
        let state = lock(&self.shared.state);
        StateSnapshot {
            name: self.config.name.clone(),
            rail_id: self.rail_id.clone(),
            phase: state.phase(fired),
            armed: state.armed,
            rail_enabled,
            elapsed_since_deadline_ms: state.elapsed_since_deadline_ms(Instant::now()),
            generation: state.generation,
            activations: state.activations,
            expirations,
            shutdowns: state.shutdowns,
            stale_jobs: state.stale_jobs,
            rail_faults: state.rail_faults,
            last_fault: state.last_fault.clone(),
        }
    }

    /// Desliga o motor, encerra timer e worker e libera o rail
    pub fn detach(mut self) -> VibratorResult<()> {
        self.teardown()
    }

    fn teardown(&mut self) -> VibratorResult<()> {
        if self.detached {
            return Ok(());
        }
        self.detached = true;

        // Sem timer, nenhum job novo entra na fila.
        self.scheduler.stop();

        let result = {
            let mut rail = lock(&self.shared.rail);
            let result = match rail.as_mut() {
                Some(handle) => handle.switch(false).map(|_| ()),
                None => Ok(()),
            };
            lock(&self.shared.state).disarm();
            if let Some(handle) = rail.take() {
                handle.release();
            }
            result
        };

        self.worker.join();

        match &result {
            Ok(()) => info!(device = %self.config.name, "vibrator detached"),
            Err(e) => error!(device = %self.config.name, error = %e, "rail left on at detach"),
        }
        result.map_err(VibratorError::from)
    }
}

impl Drop for Vibrator {
    fn drop(&mut self) {
        let _ = self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use crate::rail::{MockRail, MockRailProvider};

    fn attached() -> (Vibrator, MockRail) {
        let (provider, rail) = MockRailProvider::with_rail("hv4");
        let vib = Vibrator::attach(&provider, VibratorConfig::default()).unwrap();
        (vib, rail)
    }

    #[test]
    fn test_attach_unknown_rail() {
        let provider = MockRailProvider::new();
        let err = Vibrator::attach(&provider, VibratorConfig::default()).unwrap_err();
        assert_eq!(err, VibratorError::DeviceUnavailable("hv4".into()));
    }

    #[test]
    fn test_attach_invalid_config() {
        let (provider, rail) = MockRailProvider::with_rail("hv4");
        let config = VibratorConfig {
            default_timeout_ms: -1,
            ..Default::default()
        };
        assert!(matches!(
            Vibrator::attach(&provider, config),
            Err(VibratorError::InvalidConfig(_))
        ));
        assert!(!rail.is_held());
    }

    #[test]
    fn test_activate_arms_and_enables() {
        let (vib, rail) = attached();
        let before = Instant::now();
        vib.activate(300).unwrap();
        let after = Instant::now();

        assert!(vib.is_armed());
        assert!(rail.is_enabled());
        assert_eq!(vib.phase(), Phase::Active);
        let deadline = vib.deadline().unwrap();
        assert!(deadline >= before + Duration::from_millis(300));
        assert!(deadline <= after + Duration::from_millis(300));
    }

    #[test]
    fn test_activate_zero_when_idle() {
        let (vib, rail) = attached();
        vib.activate(0).unwrap();
        vib.activate(0).unwrap();
        assert!(!vib.is_armed());
        assert!(!rail.is_enabled());
        assert_eq!(rail.disable_calls(), 0);
    }

    #[test]
    fn test_activate_zero_cancels() {
        let (vib, rail) = attached();
        vib.activate(200).unwrap();
        vib.activate(0).unwrap();
        assert!(!vib.is_armed());
        assert!(!rail.is_enabled());
        assert_eq!(vib.phase(), Phase::Idle);

        std::thread::sleep(Duration::from_millis(300));
        assert_eq!(vib.snapshot().expirations, 0);
    }

    #[test]
    fn test_enable_failure_propagates() {
        let (vib, rail) = attached();
        rail.fail_enable(true);
        let err = vib.activate(300).unwrap_err();
        assert!(matches!(err, VibratorError::Rail(_)));
        assert!(!vib.is_armed());
        assert!(vib.fault().is_some());

        rail.fail_enable(false);
        vib.activate(300).unwrap();
        assert!(vib.is_armed());
        assert!(vib.fault().is_none());
    }

    #[test]
    fn test_disable_failure_keeps_deadline() {
        let (vib, rail) = attached();
        vib.activate(160).unwrap();
        rail.fail_disable(true);
        assert!(vib.activate(0).is_err());
        assert!(vib.is_armed());
        assert!(rail.is_enabled());
    }

    #[test]
    fn test_activate_without_timer_leaves_rail_off() {
        let (mut vib, rail) = attached();
        vib.scheduler.stop();

        let err = vib.activate(300).unwrap_err();
        assert!(matches!(err, VibratorError::Worker(_)));
        assert!(!rail.is_enabled());
        assert!(!vib.is_armed());
        assert_eq!(vib.phase(), Phase::Idle);
    }

    #[test]
    fn test_remaining_time_idle() {
        let (vib, _rail) = attached();
        assert_eq!(vib.remaining_time(), 0);
        assert_eq!(vib.phase(), Phase::Idle);
    }

    #[test]
    fn test_remaining_time_is_negative_before_deadline() {
        let (vib, _rail) = attached();
        vib.activate(400).unwrap();
        let ms = vib.remaining_time();
        assert!(ms < 0 && ms >= -400, "got {}", ms);
        assert!(vib.is_armed());
    }

    #[test]
    fn test_detach_switches_off_and_releases() {
        let (vib, rail) = attached();
        vib.activate(400).unwrap();
        vib.detach().unwrap();
        assert!(!rail.is_enabled());
        assert!(!rail.is_held());
    }

    #[test]
    fn test_drop_releases_rail() {
        let (vib, rail) = attached();
        vib.activate(400).unwrap();
        drop(vib);
        assert!(!rail.is_enabled());
        assert!(!rail.is_held());
    }

    #[test]
    fn test_debug_output() {
        let (vib, _rail) = attached();
        let dbg = format!("{:?}", vib);
        assert!(dbg.contains("vibrator"));
        assert!(dbg.contains("hv4"));
    }
}
