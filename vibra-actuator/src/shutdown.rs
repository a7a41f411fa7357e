//! Desligamento diferido
//!
//! Worker de propósito geral que executa os [`ShutdownJob`] enfileirados
//! pelo timer. Pode bloquear e chamar o rail.

use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Instant;
use crossbeam_channel::Receiver;
use tracing::{debug, error, info, warn};
use crate::controller::{lock, Shared};
use crate::error::{VibratorError, VibratorResult};

/// Pedido de desligamento do deadline `generation`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShutdownJob {
    pub generation: u64,
    pub deadline: Instant,
}

/// Resultado de um job (usado em logs e testes)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShutdownOutcome {
    /// Rail desligado, estado voltou a IDLE
    Completed,
    /// Job de um arm já substituído
    Stale,
    /// Rail já liberado (detach em andamento)
    Detached,
    /// `disable` falhou; estado desarmado mesmo assim
    Failed(String),
}

/// Handle da thread de desligamento
#[derive(Debug)]
pub struct ShutdownWorker {
    thread: Option<JoinHandle<()>>,
}

impl ShutdownWorker {
    /// Inicia a thread `<name>-shutdown`. Termina quando todos os senders caem.
    pub fn spawn(
        name: &str,
        jobs: Receiver<ShutdownJob>,
        shared: Arc<Shared>,
    ) -> VibratorResult<Self> {
        let thread = std::thread::Builder::new()
            .name(format!("{}-shutdown", name))
            .spawn(move || {
                for job in jobs.iter() {
                    execute(&shared, job);
                }
                debug!("shutdown worker exiting");
            })
            .map_err(|e| VibratorError::Worker(format!("shutdown thread: {}", e)))?;

        Ok(Self {
            thread: Some(thread),
        })
    }

    /// Aguarda o término da thread. Idempotente.
    pub fn join(&mut self) {
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!("shutdown worker panicked");
            }
        }
    }
}

/// Executa um job.
///
/// O lock do rail é mantido do teste de geração até o fim do `disable`, de
/// modo que um `activate` concorrente não pode ser desfeito por um job antigo.
/// O lock de estado nunca é mantido durante a chamada ao rail.
pub fn execute(shared: &Shared, job: ShutdownJob) -> ShutdownOutcome {
    let mut rail = lock(&shared.rail);
    let Some(handle) = rail.as_mut() else {
        debug!(generation = job.generation, "rail released, dropping job");
        return ShutdownOutcome::Detached;
    };

    {
        let mut state = lock(&shared.state);
        if !state.is_current(job.generation) {
            state.stale_jobs += 1;
            debug!(
                generation = job.generation,
                current = state.generation,
                "stale shutdown job ignored"
            );
            return ShutdownOutcome::Stale;
        }
    }

    let result = handle.switch(false);

    let mut state = lock(&shared.state);
    state.complete_shutdown(job.generation);
    match result {
        Ok(_) => {
            let late = Instant::now().saturating_duration_since(job.deadline);
            info!(
                generation = job.generation,
                late_ms = late.as_millis() as u64,
                "vibration period ended"
            );
            ShutdownOutcome::Completed
        }
        Err(e) => {
            error!(generation = job.generation, error = %e, "failed to switch rail off");
            state.record_fault(e.to_string());
            ShutdownOutcome::Failed(e.to_string())
        }
    }
}
