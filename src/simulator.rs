/*!
 * Container sensor simulator
 *
 * Posts synthetic fill-level readings to a running API, one round per
 * interval, so the status snapshot and route planner have something to work
 * with during development and demos.
 */

use anyhow::{anyhow, Context};
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Triangular};
use reqwest::StatusCode;
use serde_json::json;
use smartwaste_core::Container;
use std::future::Future;
use std::time::Duration;

use crate::error::{CliError, Result};

/// Triangular fill-level distribution, mapping bad parameters to a config error
pub fn fill_distribution(low: f64, high: f64, mode: f64) -> Result<Triangular<f64>> {
    Triangular::new(low, high, mode).map_err(|e| {
        CliError::Config(format!(
            "invalid fill distribution (low={} high={} mode={}): {}",
            low, high, mode, e
        ))
    })
}

/// Fill levels skew towards "fairly full", like real containers between rounds
pub fn default_fill_distribution() -> Result<Triangular<f64>> {
    fill_distribution(5.0, 100.0, 70.0)
}

/// Result of posting one reading
#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    Accepted { fill_level: i32 },
    Rejected { status: u16, body: String },
    Unreachable(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoundSummary {
    pub accepted: usize,
    pub rejected: usize,
    pub unreachable: usize,
}

pub struct Simulator {
    client: reqwest::Client,
    api_url: String,
    interval: Duration,
    containers: Vec<String>,
    fill: Triangular<f64>,
    rng: StdRng,
    /// Pause between two containers of the same round
    jitter: (f64, f64),
}

impl Simulator {
    pub fn new(api_url: &str, interval: Duration, containers: Vec<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            interval,
            containers,
            fill: default_fill_distribution()?,
            rng: StdRng::from_os_rng(),
            jitter: (0.2, 1.0),
        })
    }

    /// Deterministic sampling and no pauses, for tests
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self.jitter = (0.0, 0.0);
        self
    }

    pub fn containers(&self) -> &[String] {
        &self.containers
    }

    /// Ask the API for every registered container id
    pub async fn fetch_container_ids(&self) -> anyhow::Result<Vec<String>> {
        let url = format!("{}/api/v1/containers", self.api_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("GET {}", url))?;

        if !response.status().is_success() {
            return Err(anyhow!("GET {} returned {}", url, response.status()));
        }

        let containers: Vec<Container> = response
            .json()
            .await
            .context("container list is not valid JSON")?;
        Ok(containers.into_iter().map(|c| c.id).collect())
    }

    /// Use the configured containers, or discover them through the API
    pub async fn resolve_containers(&mut self) -> Result<()> {
        if self.containers.is_empty() {
            self.containers = self.fetch_container_ids().await?;
            tracing::info!(count = self.containers.len(), "Discovered containers from API");
        }
        if self.containers.is_empty() {
            return Err(CliError::Usage(
                "no containers to simulate; register some or pass --container".to_string(),
            ));
        }
        Ok(())
    }

    pub async fn send_reading(&mut self, container_id: &str) -> SendOutcome {
        let fill_level = self.fill.sample(&mut self.rng) as i32;
        let url = format!("{}/api/v1/readings", self.api_url);
        let payload = json!({
            "container_id": container_id,
            "fill_level": fill_level,
            "timestamp": Utc::now(),
        });

        match self.client.post(&url).json(&payload).send().await {
            Ok(response) if response.status() == StatusCode::ACCEPTED => {
                tracing::debug!(container_id, fill_level, "Reading accepted");
                SendOutcome::Accepted { fill_level }
            }
            Ok(response) => {
                let status = response.status().as_u16();
                let body = response.text().await.unwrap_or_default();
                tracing::warn!(container_id, status, body = %body, "Reading rejected");
                SendOutcome::Rejected { status, body }
            }
            Err(err) => {
                tracing::error!(container_id, error = %err, "API unreachable");
                SendOutcome::Unreachable(err.to_string())
            }
        }
    }

    /// One reading per container, with a short random pause between each
    pub async fn run_round(&mut self) -> RoundSummary {
        let mut summary = RoundSummary::default();
        let containers = self.containers.clone();

        for id in &containers {
            match self.send_reading(id).await {
                SendOutcome::Accepted { .. } => summary.accepted += 1,
                SendOutcome::Rejected { .. } => summary.rejected += 1,
                SendOutcome::Unreachable(_) => summary.unreachable += 1,
            }

            let (lo, hi) = self.jitter;
            if hi > 0.0 {
                let pause = self.rng.random_range(lo..hi);
                tokio::time::sleep(Duration::from_secs_f64(pause)).await;
            }
        }

        summary
    }

    /// Run rounds until `shutdown` resolves
    pub async fn run<F>(&mut self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        self.resolve_containers().await?;
        tracing::info!(
            api = %self.api_url,
            containers = self.containers.len(),
            interval_secs = self.interval.as_secs(),
            "Simulator started"
        );

        tokio::pin!(shutdown);
        loop {
            let summary = tokio::select! {
                summary = self.run_round() => summary,
                _ = &mut shutdown => break,
            };
            tracing::info!(
                accepted = summary.accepted,
                rejected = summary.rejected,
                unreachable = summary.unreachable,
                "Round complete"
            );

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {},
                _ = &mut shutdown => break,
            }
        }

        tracing::info!("Simulator stopped");
        Ok(())
    }
}
