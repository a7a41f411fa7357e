//! Configuração do vibrador

use serde::{Deserialize, Serialize};
use vibra_core::config::{ensure_loaded, lookup_or};
use crate::error::{VibratorError, VibratorResult};
use crate::types::{
    TimeoutPolicy, DEFAULT_RAIL_ID, DEFAULT_TIMEOUT_MS, DEVICE_NAME, MAX_TIMEOUT_MS,
    MIN_TIMEOUT_MS,
};

/// Configuração do vibrador
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VibratorConfig {
    /// Nome do device (também prefixo das threads)
    pub name: String,
    /// Identificador do rail de alimentação
    pub rail_id: String,
    /// Pedidos `<= min` são substituídos pelo default (ms)
    pub min_timeout_ms: i64,
    /// Timeout aplicado a pedidos curtos (ms)
    pub default_timeout_ms: i64,
    /// Limite nominal, apenas informativo (ms)
    pub max_timeout_ms: i64,
}

impl Default for VibratorConfig {
    fn default() -> Self {
        Self {
            name: DEVICE_NAME.to_string(),
            rail_id: DEFAULT_RAIL_ID.to_string(),
            min_timeout_ms: MIN_TIMEOUT_MS,
            default_timeout_ms: DEFAULT_TIMEOUT_MS,
            max_timeout_ms: MAX_TIMEOUT_MS,
        }
    }
}

impl VibratorConfig {
    /// Lê `VIBRATOR_*` do ambiente (e do `.env`, se houver)
    pub fn from_env() -> Self {
        ensure_loaded();
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Lê a configuração de um lookup arbitrário
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let d = Self::default();
        Self {
            name: lookup_or(&lookup, "VIBRATOR_NAME", d.name),
            rail_id: lookup_or(&lookup, "VIBRATOR_RAIL", d.rail_id),
            min_timeout_ms: lookup_or(&lookup, "VIBRATOR_MIN_TIMEOUT_MS", d.min_timeout_ms),
            default_timeout_ms: lookup_or(
                &lookup,
                "VIBRATOR_DEFAULT_TIMEOUT_MS",
                d.default_timeout_ms,
            ),
            max_timeout_ms: lookup_or(&lookup, "VIBRATOR_MAX_TIMEOUT_MS", d.max_timeout_ms),
        }
    }

    /// Valida a configuração
    pub fn validate(&self) -> VibratorResult<()> {
        if self.name.is_empty() {
            return Err(VibratorError::InvalidConfig("name must not be empty".into()));
        }
        if self.default_timeout_ms <= 0 {
            return Err(VibratorError::InvalidConfig(
                "default_timeout_ms must be positive".into(),
            ));
        }
        if self.min_timeout_ms < 0 {
            return Err(VibratorError::InvalidConfig(
                "min_timeout_ms must not be negative".into(),
            ));
        }
        Ok(())
    }

    /// Política de timeout derivada
    pub fn policy(&self) -> TimeoutPolicy {
        TimeoutPolicy {
            min_ms: self.min_timeout_ms,
            default_ms: self.default_timeout_ms,
            max_ms: self.max_timeout_ms,
        }
    }
}
