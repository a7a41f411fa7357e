//! Inicialização de logging (`tracing-subscriber`)

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Filtro usado quando `RUST_LOG` não está definido
pub const DEFAULT_FILTER: &str = "vibra_actuator=info,vibra_core=info";

/// Instala o subscriber global (EnvFilter + fmt).
///
/// Retorna `false` se já havia um subscriber instalado; chamar várias vezes
/// (ex.: um por teste) é seguro.
pub fn init() -> bool {
    init_with_default(DEFAULT_FILTER)
}

/// Igual a [`init`], com filtro padrão customizado.
pub fn init_with_default(default_filter: &str) -> bool {
    let installed = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(filter = default_filter, "tracing subscriber installed");
    }
    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_repeatable() {
        let _ = init();
        assert!(!init());
    }

    #[test]
    fn test_init_sets_global_dispatcher() {
        let _ = init_with_default("vibra_core=debug");
        assert!(tracing::dispatcher::has_been_set());
    }
}
