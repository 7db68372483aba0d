use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_DIRECTIVE: &str = "info";

/// Where and how verbosely the service logs
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub directive: String,
    pub loki: Option<LokiTarget>,
}

/// Labels and endpoint for shipping logs to Loki
#[derive(Debug, Clone, PartialEq)]
pub struct LokiTarget {
    pub url: String,
    pub service: String,
    pub environment: String,
}

impl LoggingConfig {
    /// `RUST_LOG` sets the filter; `LOKI_ENABLED=true` plus `LOKI_URL` adds Loki
    pub fn from_env() -> anyhow::Result<Self> {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());

        let loki_enabled = var("LOKI_ENABLED")
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let loki = match (loki_enabled, var("LOKI_URL")) {
            (false, _) => None,
            (true, None) => anyhow::bail!("LOKI_ENABLED is true but LOKI_URL is not set"),
            (true, Some(url)) => Some(LokiTarget {
                url,
                service: var("SERVICE_NAME").unwrap_or_else(|| "sentimarket".to_string()),
                environment: var("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            }),
        };

        Ok(Self {
            directive: var("RUST_LOG").unwrap_or_else(|| DEFAULT_DIRECTIVE.to_string()),
            loki,
        })
    }

    /// The configured filter, or `info` when the directive doesn't parse
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.directive).unwrap_or_else(|e| {
            eprintln!("Invalid RUST_LOG '{}' ({}), using '{}'", self.directive, e, DEFAULT_DIRECTIVE);
            EnvFilter::new(DEFAULT_DIRECTIVE)
        })
    }
}

/// Install the global subscriber: console output, plus Loki when configured
/// and the `loki` feature is built in
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let registry = tracing_subscriber::registry()
        .with(config.env_filter())
        .with(tracing_subscriber::fmt::layer());

    #[cfg(feature = "loki")]
    let registry = registry.with(loki_layer(config.loki.as_ref())?);

    #[cfg(not(feature = "loki"))]
    if let Some(target) = &config.loki {
        eprintln!("Built without the loki feature; not shipping logs to {}", target.url);
    }

    registry.try_init()?;

    tracing::info!(
        "Logging initialized (filter: {}, loki: {})",
        config.directive,
        config.loki.as_ref().map(|t| t.url.as_str()).unwrap_or("off")
    );
    Ok(())
}

#[cfg(feature = "loki")]
fn loki_layer(target: Option<&LokiTarget>) -> anyhow::Result<Option<tracing_loki::Layer>> {
    let Some(target) = target else {
        return Ok(None);
    };

    let (layer, task) = tracing_loki::builder()
        .label("service", target.service.as_str())?
        .label("environment", target.environment.as_str())?
        .build_url(url::Url::parse(&target.url)?)?;

    // Ships buffered log lines in the background
    tokio::spawn(task);
    Ok(Some(layer))
}
