//! Rail de alimentação do motor
//!
//! [`PowerRail`] é o contrato com o regulador externo; [`RailHandle`] é o
//! adaptador que consulta o estado antes de chavear. [`MockRail`] e
//! [`MockRailProvider`] simulam o hardware para testes e benches.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use tracing::{debug, info};
use crate::error::RailError;

/// Regulador que alimenta o motor.
///
/// `enable`/`disable` devem ser idempotentes.
pub trait PowerRail: Send + Debug {
    /// Identificador do rail (ex.: "hv4")
    fn id(&self) -> &str;

    /// Rail está ligado?
    fn is_enabled(&self) -> bool;

    /// Liga o rail
    fn enable(&mut self) -> Result<(), RailError>;

    /// Desliga o rail
    fn disable(&mut self) -> Result<(), RailError>;

    /// Devolve o rail ao provedor (detach)
    fn release(&mut self) {}
}

/// Resolve identificadores de rail no attach
pub trait RailProvider {
    /// Retorna `None` se o rail não existe ou já está em uso
    fn acquire(&self, id: &str) -> Option<Box<dyn PowerRail>>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// ADAPTADOR
// ═══════════════════════════════════════════════════════════════════════════════

/// Handle exclusivo do rail, com checagem de estado antes de chavear
#[derive(Debug)]
pub struct RailHandle {
    rail: Box<dyn PowerRail>,
}

impl RailHandle {
    pub fn new(rail: Box<dyn PowerRail>) -> Self {
        Self { rail }
    }

    pub fn id(&self) -> &str {
        self.rail.id()
    }

    pub fn is_enabled(&self) -> bool {
        self.rail.is_enabled()
    }

    /// Liga ou desliga o motor. Retorna `true` se houve chamada ao rail.
    pub fn switch(&mut self, on: bool) -> Result<bool, RailError> {
        info!(rail = self.rail.id(), "Vibrator {}", if on { "on" } else { "off" });

        if on == self.rail.is_enabled() {
            debug!(rail = self.rail.id(), "rail already in requested state");
            return Ok(false);
        }

        if on {
            self.rail.enable()?;
        } else {
            self.rail.disable()?;
        }
        Ok(true)
    }

    /// Libera o rail (consome o handle)
    pub fn release(mut self) {
        debug!(rail = self.rail.id(), "releasing rail");
        self.rail.release();
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// MOCK HARDWARE
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Default)]
struct MockRailInner {
    enabled: AtomicBool,
    held: AtomicBool,
    fail_enable: AtomicBool,
    fail_disable: AtomicBool,
    enable_calls: AtomicU32,
    disable_calls: AtomicU32,
}

/// Regulador simulado.
///
/// Clones compartilham o mesmo estado: o teste guarda um clone para
/// observar o que o driver fez com o outro.
#[derive(Debug, Clone)]
pub struct MockRail {
    id: String,
    inner: Arc<MockRailInner>,
}

impl MockRail {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            inner: Arc::new(MockRailInner::default()),
        }
    }

    /// Estado físico simulado
    pub fn is_enabled(&self) -> bool {
        self.inner.enabled.load(Ordering::SeqCst)
    }

    /// Número de chamadas efetivas a `enable`
    pub fn enable_calls(&self) -> u32 {
        self.inner.enable_calls.load(Ordering::SeqCst)
    }

    /// Número de chamadas efetivas a `disable`
    pub fn disable_calls(&self) -> u32 {
        self.inner.disable_calls.load(Ordering::SeqCst)
    }

    /// Algum consumidor detém o rail?
    pub fn is_held(&self) -> bool {
        self.inner.held.load(Ordering::SeqCst)
    }

    /// Injeta falha nas próximas chamadas a `enable`
    pub fn fail_enable(&self, fail: bool) {
        self.inner.fail_enable.store(fail, Ordering::SeqCst);
    }

    /// Injeta falha nas próximas chamadas a `disable`
    pub fn fail_disable(&self, fail: bool) {
        self.inner.fail_disable.store(fail, Ordering::SeqCst);
    }

    /// Força o estado físico (simula outro consumidor)
    pub fn force_enabled(&self, on: bool) {
        self.inner.enabled.store(on, Ordering::SeqCst);
    }
}

impl PowerRail for MockRail {
    fn id(&self) -> &str {
        &self.id
    }

    fn is_enabled(&self) -> bool {
        MockRail::is_enabled(self)
    }

    fn enable(&mut self) -> Result<(), RailError> {
        if self.inner.fail_enable.load(Ordering::SeqCst) {
            return Err(RailError::Bus(format!("{}: enable failed", self.id)));
        }
        self.inner.enable_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.enabled.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn disable(&mut self) -> Result<(), RailError> {
        if self.inner.fail_disable.load(Ordering::SeqCst) {
            return Err(RailError::Bus(format!("{}: disable failed", self.id)));
        }
        self.inner.disable_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.enabled.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn release(&mut self) {
        self.inner.held.store(false, Ordering::SeqCst);
    }
}

/// Tabela de reguladores simulados, indexada por id
#[derive(Debug, Clone, Default)]
pub struct MockRailProvider {
    rails: HashMap<String, MockRail>,
}

impl MockRailProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra um rail e devolve um clone para observação
    pub fn register(&mut self, id: &str) -> MockRail {
        let rail = MockRail::new(id);
        self.rails.insert(id.to_string(), rail.clone());
        rail
    }

    /// Provedor com um único rail registrado
    pub fn with_rail(id: &str) -> (Self, MockRail) {
        let mut provider = Self::new();
        let rail = provider.register(id);
        (provider, rail)
    }
}

impl RailProvider for MockRailProvider {
    fn acquire(&self, id: &str) -> Option<Box<dyn PowerRail>> {
        let rail = self.rails.get(id)?;
        if rail.inner.held.swap(true, Ordering::SeqCst) {
            return None;
        }
        Some(Box::new(rail.clone()))
    }
}
