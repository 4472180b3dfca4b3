use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;
use url::Url;

use crate::view::FilterCriteria;

/// Sports prediction dashboard
#[derive(Parser, Debug, Clone)]
#[command(name = "sports-predictor-dashboard", version, about)]
pub struct Config {
    /// Prediction service base URL (predictions are fetched from `<base>/predictions`)
    #[arg(long, env = "PREDICTIONS_API_BASE", default_value = "http://localhost:8000/api")]
    pub api_base: String,

    /// Dashboard listen address
    #[arg(long, env = "DASHBOARD_ADDR", default_value = "0.0.0.0:8080")]
    pub dashboard_addr: String,

    /// HTTP request timeout in seconds (0 disables the timeout)
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value = "10")]
    pub request_timeout_secs: u64,

    /// Initial sport filter
    #[arg(long, env = "FILTER_SPORT")]
    pub sport: Option<String>,

    /// Initial league filter
    #[arg(long, env = "FILTER_LEAGUE")]
    pub league: Option<String>,

    /// Initial market type filter (e.g. "moneyline", "player prop")
    #[arg(long, env = "FILTER_MARKET_TYPE")]
    pub market_type: Option<String>,

    /// Initial confidence tier filter (low, medium, high)
    #[arg(long, env = "FILTER_CONFIDENCE")]
    pub confidence: Option<String>,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        let base = Url::parse(&self.api_base).map_err(|e| {
            anyhow::anyhow!("api_base '{}' is not a valid URL: {}", self.api_base, e)
        })?;
        if !matches!(base.scheme(), "http" | "https") {
            anyhow::bail!("api_base must use http or https, got '{}'", base.scheme());
        }
        if self.dashboard_addr.parse::<SocketAddr>().is_err() {
            anyhow::bail!("dashboard_addr '{}' is not a socket address", self.dashboard_addr);
        }
        if let Some(tier) = self.confidence.as_deref().filter(|t| !t.is_empty()) {
            if !matches!(tier, "low" | "medium" | "high") {
                anyhow::bail!("confidence must be one of low, medium, high");
            }
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }

    /// Filters applied on startup before any user edit.
    pub fn initial_filters(&self) -> FilterCriteria {
        FilterCriteria {
            sport: self.sport.clone(),
            league: self.league.clone(),
            market_type: self.market_type.clone(),
            confidence: self.confidence.clone(),
            ..FilterCriteria::default()
        }
    }
}
