//! Tipos de dados do vibrador

use std::time::Duration;
use serde::{Deserialize, Serialize};

/// Abaixo (ou igual) deste valor o pedido é substituído pelo default
pub const MIN_TIMEOUT_MS: i64 = 150;
/// Timeout aplicado a pedidos curtos demais
pub const DEFAULT_TIMEOUT_MS: i64 = 170;
/// Limite superior nominal. Não é aplicado pela política.
pub const MAX_TIMEOUT_MS: i64 = 500;
/// Rail usado quando a plataforma não informa nenhum
pub const DEFAULT_RAIL_ID: &str = "hv4";
/// Nome do device exposto ao host
pub const DEVICE_NAME: &str = "vibrator";

/// Pedido do host em milissegundos (`timed_output`-style: 0 = desligar)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeoutMs(pub i64);

impl TimeoutMs {
    /// Cria novo pedido
    pub fn new(ms: i64) -> Self {
        Self(ms)
    }

    /// Pedido de desligamento imediato
    pub fn off() -> Self {
        Self(0)
    }

    /// É pedido de desligamento?
    pub fn is_off(&self) -> bool {
        self.0 == 0
    }
}

impl From<i64> for TimeoutMs {
    fn from(ms: i64) -> Self {
        Self(ms)
    }
}

/// Resultado da política de timeout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    /// Desligar agora e cancelar o deadline
    Off,
    /// Ligar por este tempo
    On(Duration),
}

/// Política de substituição de timeout.
///
/// `requested > min_ms` é respeitado literalmente; qualquer outro valor
/// diferente de zero (inclusive negativo) vira `default_ms`. `max_ms` não
/// limita nada.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeoutPolicy {
    pub min_ms: i64,
    pub default_ms: i64,
    pub max_ms: i64,
}

impl Default for TimeoutPolicy {
    fn default() -> Self {
        Self {
            min_ms: MIN_TIMEOUT_MS,
            default_ms: DEFAULT_TIMEOUT_MS,
            max_ms: MAX_TIMEOUT_MS,
        }
    }
}

impl TimeoutPolicy {
    /// Resolve o pedido do host
    pub fn resolve(&self, requested: TimeoutMs) -> Request {
        if requested.is_off() {
            return Request::Off;
        }
        let ms = if requested.0 > self.min_ms {
            requested.0
        } else {
            self.default_ms
        };
        Request::On(Duration::from_millis(ms.unsigned_abs()))
    }

    /// O pedido ultrapassa o limite nominal?
    pub fn exceeds_max(&self, requested: TimeoutMs) -> bool {
        requested.0 > self.max_ms
    }
}

/// Fase da máquina de estados
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Desarmado, rail desligado
    Idle,
    /// Armado, rail ligado, deadline pendente
    Active,
    /// Deadline disparou, desligamento na fila ou em execução
    ShuttingDown,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Active => "active",
            Phase::ShuttingDown => "shutting-down",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
