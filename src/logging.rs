use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

type InitResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Loki `service` label of every event this binary ships
pub const SERVICE_LABEL: &str = "frontier-selector";

const FALLBACK_LEVEL: &str = "info";

/// Where log events go: always the console, optionally Loki as well
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// `RUST_LOG` directives
    pub filter: String,
    pub environment: String,
    /// Set only when `LOKI_ENABLED=true`
    pub loki_url: Option<String>,
    loki_requested: bool,
}

impl LoggingConfig {
    pub fn from_env() -> Self {
        let var = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());
        let loki_requested = var("LOKI_ENABLED").is_some_and(|v| v.trim().eq_ignore_ascii_case("true"));

        Self {
            filter: var("RUST_LOG").unwrap_or_else(|| FALLBACK_LEVEL.to_string()),
            environment: var("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            loki_url: var("LOKI_URL").filter(|_| loki_requested),
            loki_requested,
        }
    }

    pub fn console(filter: &str) -> Self {
        Self {
            filter: filter.to_string(),
            environment: "development".to_string(),
            loki_url: None,
            loki_requested: false,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.loki_requested && self.loki_url.is_none() {
            return Err("LOKI_ENABLED is true but LOKI_URL is not set".to_string());
        }
        Ok(())
    }

    /// Filter from the configured directives. A typo in `RUST_LOG` falls back
    /// to `info` instead of silencing everything.
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.filter).unwrap_or_else(|_| EnvFilter::new(FALLBACK_LEVEL))
    }

    pub fn labels(&self) -> [(&'static str, &str); 2] {
        [("service", SERVICE_LABEL), ("environment", self.environment.as_str())]
    }
}

/// Installs the global subscriber. Call once, before anything logs.
pub fn init_logging(config: LoggingConfig) -> InitResult {
    config.validate()?;

    #[cfg(feature = "loki")]
    {
        if let Some(loki_url) = config.loki_url.as_deref() {
            return init_with_loki(&config, loki_url);
        }
    }

    tracing_subscriber::registry()
        .with(config.env_filter())
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;

    tracing::info!("📊 Console logging initialized ({})", config.filter);
    Ok(())
}

#[cfg(feature = "loki")]
fn init_with_loki(config: &LoggingConfig, loki_url: &str) -> InitResult {
    let mut builder = tracing_loki::builder();
    for (key, value) in config.labels() {
        builder = builder.label(key, value)?;
    }
    let (loki_layer, task) = builder.build_url(url::Url::parse(loki_url)?)?;

    // Ships buffered events to Loki; needs a running tokio runtime
    tokio::spawn(task);

    tracing_subscriber::registry()
        .with(config.env_filter())
        .with(tracing_subscriber::fmt::layer())
        .with(loki_layer)
        .try_init()?;

    tracing::info!("✅ Loki logging initialized at {}", loki_url);
    Ok(())
}
