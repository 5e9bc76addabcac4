//! Export service connection settings

use crate::validation::{ConfigSection, ValidationError, Validator};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Remote export service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServiceConfig {
    /// Base URL of the exports API, e.g. `https://host/api/exports`
    pub base_url: String,

    /// Whole-request timeout in seconds (0 = no timeout)
    pub timeout_secs: u64,

    /// User agent sent with every request
    pub user_agent: String,

    /// Maximum redirects to follow
    pub max_redirects: usize,
}

impl ServiceConfig {
    /// Request timeout, `None` when disabled
    pub fn timeout(&self) -> Option<Duration> {
        match self.timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api/exports".to_string(),
            timeout_secs: 0,
            user_agent: format!("geoexport/{}", env!("CARGO_PKG_VERSION")),
            max_redirects: 10,
        }
    }
}

impl ConfigSection for ServiceConfig {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut results = vec![
            Validator::http_url(&self.base_url, "service.base_url"),
            Validator::not_empty(&self.user_agent, "service.user_agent"),
            Validator::in_range(self.max_redirects, 0..=20, "service.max_redirects"),
        ];

        if self.timeout_secs != 0 {
            results.push(Validator::in_range(
                self.timeout_secs,
                1..=3600,
                "service.timeout_secs",
            ));
        }

        Validator::collect_errors(results)
    }

    fn merge(&mut self, other: Self) {
        self.base_url = other.base_url;
        self.timeout_secs = other.timeout_secs;
        self.user_agent = other.user_agent;
        self.max_redirects = other.max_redirects;
    }

    fn section_name(&self) -> &'static str {
        "service"
    }
}
