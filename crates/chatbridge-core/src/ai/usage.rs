//! Token usage monitoring
//!
//! Per provider and model counters of requests, failures and tokens.
//! Counters only grow; a snapshot is a point-in-time copy.

use dashmap::DashMap;
use serde::Serialize;

use super::providers::ProviderTag;

#[derive(Debug, Clone, Copy, Default)]
struct Counters {
    requests: u64,
    failures: u64,
    tokens: u64,
}

/// One row of a usage snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsageRecord {
    pub provider: ProviderTag,
    pub model: String,
    pub requests: u64,
    pub failures: u64,
    pub tokens: u64,
}

/// Concurrent usage counters shared by all calls through a router
#[derive(Debug, Default)]
pub struct UsageMonitor {
    counters: DashMap<(ProviderTag, String), Counters>,
}

impl UsageMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed call and the tokens it reported
    pub fn record_success(&self, provider: ProviderTag, model: &str, tokens: u64) {
        let mut entry = self
            .counters
            .entry((provider, model.to_string()))
            .or_default();
        entry.requests += 1;
        entry.tokens += tokens;
    }

    /// Record a call that ended in an error
    pub fn record_failure(&self, provider: ProviderTag, model: &str) {
        let mut entry = self
            .counters
            .entry((provider, model.to_string()))
            .or_default();
        entry.requests += 1;
        entry.failures += 1;
    }

    /// Total tokens reported for one provider
    pub fn total_tokens(&self, provider: ProviderTag) -> u64 {
        self.counters
            .iter()
            .filter(|entry| entry.key().0 == provider)
            .map(|entry| entry.value().tokens)
            .sum()
    }

    /// Copy of all counters, sorted by provider then model
    pub fn snapshot(&self) -> Vec<UsageRecord> {
        let mut records: Vec<UsageRecord> = self
            .counters
            .iter()
            .map(|entry| {
                let (provider, model) = entry.key();
                let c = entry.value();
                UsageRecord {
                    provider: *provider,
                    model: model.clone(),
                    requests: c.requests,
                    failures: c.failures,
                    tokens: c.tokens,
                }
            })
            .collect();
        records.sort_by(|a, b| (a.provider, &a.model).cmp(&(b.provider, &b.model)));
        records
    }
}
