//! Timer one-shot de deadline
//!
//! Roda numa thread própria que nunca toca o rail nem os locks de estado:
//! no disparo só marca a geração expirada e enfileira um [`ShutdownJob`].
//! Há um único slot pendente, então rearmar substitui o deadline anterior.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Instant;
use crossbeam_channel::{select, unbounded, Receiver, Sender};
use tracing::{debug, warn};
use crate::error::{VibratorError, VibratorResult};
use crate::shutdown::ShutdownJob;
use crate::state::ArmToken;

/// Contadores escritos pelo timer sem lock
#[derive(Debug, Default)]
pub struct ExpiryCounters {
    fired_generation: AtomicU64,
    expirations: AtomicU64,
}

impl ExpiryCounters {
    /// Geração do último deadline disparado
    pub fn fired_generation(&self) -> u64 {
        self.fired_generation.load(Ordering::Acquire)
    }

    /// Total de disparos
    pub fn expirations(&self) -> u64 {
        self.expirations.load(Ordering::Acquire)
    }

    fn mark(&self, generation: u64) {
        self.fired_generation.store(generation, Ordering::Release);
        self.expirations.fetch_add(1, Ordering::AcqRel);
    }
}

#[derive(Debug)]
enum TimerCommand {
    Arm(ArmToken),
    Cancel,
    Stop,
}

/// Handle da thread de timer
#[derive(Debug)]
pub struct TimeoutScheduler {
    commands: Sender<TimerCommand>,
    thread: Option<JoinHandle<()>>,
}

impl TimeoutScheduler {
    /// Inicia a thread `<name>-timer`
    pub fn spawn(
        name: &str,
        jobs: Sender<ShutdownJob>,
        counters: Arc<ExpiryCounters>,
    ) -> VibratorResult<Self> {
        let (commands, rx) = unbounded();
        let thread = std::thread::Builder::new()
            .name(format!("{}-timer", name))
            .spawn(move || run(rx, jobs, counters))
            .map_err(|e| VibratorError::Worker(format!("timer thread: {}", e)))?;

        Ok(Self {
            commands,
            thread: Some(thread),
        })
    }

    /// Arma (ou substitui) o deadline pendente
    pub fn arm(&self, token: ArmToken) -> VibratorResult<()> {
        self.send(TimerCommand::Arm(token))
    }

    /// Descarta o deadline pendente, se houver
    pub fn cancel(&self) -> VibratorResult<()> {
        self.send(TimerCommand::Cancel)
    }

    /// Para a thread e aguarda o término. Idempotente.
    pub fn stop(&mut self) {
        let Some(thread) = self.thread.take() else {
            return;
        };
        let _ = self.commands.send(TimerCommand::Stop);
        if thread.join().is_err() {
            warn!("timer thread panicked");
        }
    }

    fn send(&self, cmd: TimerCommand) -> VibratorResult<()> {
        self.commands
            .send(cmd)
            .map_err(|_| VibratorError::Worker("timer thread is gone".into()))
    }
}

impl Drop for TimeoutScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run(commands: Receiver<TimerCommand>, jobs: Sender<ShutdownJob>, counters: Arc<ExpiryCounters>) {
    let mut pending: Option<ArmToken> = None;

    loop {
        let timer = match pending {
            Some(token) => crossbeam_channel::at(token.deadline),
            None => crossbeam_channel::never::<Instant>(),
        };

        select! {
            recv(commands) -> cmd => match cmd {
                Ok(TimerCommand::Arm(token)) => {
                    if let Some(old) = pending.replace(token) {
                        debug!(old = old.generation, new = token.generation, "deadline replaced");
                    }
                }
                Ok(TimerCommand::Cancel) => {
                    pending = None;
                }
                Ok(TimerCommand::Stop) | Err(_) => break,
            },
            recv(timer) -> _ => {
                if let Some(token) = pending.take() {
                    on_expired(token, &jobs, &counters);
                }
            }
        }
    }

    debug!("timer thread exiting");
}

/// Handler de expiração: não bloqueia, só repassa.
fn on_expired(token: ArmToken, jobs: &Sender<ShutdownJob>, counters: &ExpiryCounters) {
    counters.mark(token.generation);
    debug!(generation = token.generation, "deadline expired, queueing shutdown");

    let job = ShutdownJob {
        generation: token.generation,
        deadline: token.deadline,
    };
    if jobs.send(job).is_err() {
        warn!(generation = token.generation, "shutdown worker is gone, job dropped");
    }
}
