//! Plan execution
//!
//! Drives a convergence plan through a [`NicTransport`], one op at a
//! time. After every mutation the server is re-read and the mutation is
//! confirmed against the fresh interface list; an unconfirmed mutation is
//! a conflict and aborts the run. The first failure of any kind stops
//! the remaining ops — the caller must re-read observed state before
//! retrying, never assume the skipped ops ran.

use crate::error::{NicError, Result};
use crate::observed::ObservedServer;
use crate::op::{NetworkOp, Plan};
use crate::transport::NicTransport;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Retry configuration for transient transport failures
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts per operation
    pub max_attempts: u32,

    /// Initial delay between retries
    pub initial_delay: Duration,

    /// Maximum delay between retries
    pub max_delay: Duration,

    /// Backoff multiplier
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
        }
    }
}

/// Result of a single executed op
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpResult {
    /// The op that ran
    pub op: NetworkOp,

    /// Whether it was applied and confirmed
    pub success: bool,

    /// Success message
    pub message: String,

    /// Error message if failed
    pub error: Option<String>,
}

/// Outcome of driving one plan, including partial completion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyReport {
    /// Per-op results, in plan order, up to and including the first failure
    pub results: Vec<OpResult>,

    /// Index into the plan of the last successfully applied op.
    /// Operators can resume from the next index after fixing the cause.
    pub last_applied: Option<usize>,

    /// Interface list as read after the last executed op
    pub observed: Option<ObservedServer>,

    /// Total execution time in milliseconds
    pub duration_ms: u64,
}

impl ApplyReport {
    pub fn is_success(&self) -> bool {
        self.results.iter().all(|r| r.success)
    }

    pub fn applied_count(&self) -> usize {
        self.last_applied.map_or(0, |i| i + 1)
    }
}

/// Executes plans against a transport, serialized per server.
pub struct NicApplier<'a> {
    transport: &'a dyn NicTransport,
    retry: RetryConfig,
}

impl<'a> NicApplier<'a> {
    pub fn new(transport: &'a dyn NicTransport) -> Self {
        Self {
            transport,
            retry: RetryConfig::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Run the plan's ops in order, stopping at the first failure.
    ///
    /// Errors from the initial server read are returned directly: nothing
    /// was applied and the caller can simply retry. Once execution starts,
    /// failures are reported through the [`ApplyReport`] instead.
    pub async fn apply(&self, server_id: &str, plan: &Plan) -> Result<ApplyReport> {
        let start = std::time::Instant::now();
        let mut report = ApplyReport {
            results: Vec::new(),
            last_applied: None,
            observed: None,
            duration_ms: 0,
        };

        if plan.is_empty() {
            report.duration_ms = start.elapsed().as_millis() as u64;
            return Ok(report);
        }

        tracing::info!(server_id, summary = %plan.summary(), "applying plan");

        let mut before = self.transport.read_server(server_id).await?;

        for (index, op) in plan.ops.iter().enumerate() {
            match self.run_op(server_id, op).await {
                Ok(()) => {}
                Err(e) => {
                    tracing::warn!(server_id, %op, error = %e, "op failed, aborting plan");
                    report.results.push(OpResult {
                        op: *op,
                        success: false,
                        message: String::new(),
                        error: Some(e.to_string()),
                    });
                    break;
                }
            }

            // Read-after-write confirmation.
            let after = match self.transport.read_server(server_id).await {
                Ok(observed) => observed,
                Err(e) => {
                    report.results.push(OpResult {
                        op: *op,
                        success: false,
                        message: String::new(),
                        error: Some(format!("適用後の再読込に失敗: {}", e)),
                    });
                    break;
                }
            };

            if !confirms(op, &before, &after) {
                let conflict =
                    NicError::Conflict(format!("{} が観測状態に反映されていません", op));
                tracing::warn!(server_id, %op, "mutation not confirmed by re-read");
                report.results.push(OpResult {
                    op: *op,
                    success: false,
                    message: String::new(),
                    error: Some(conflict.to_string()),
                });
                report.observed = Some(after);
                break;
            }

            tracing::debug!(server_id, %op, "op confirmed");
            report.results.push(OpResult {
                op: *op,
                success: true,
                message: format!("{} を適用しました", op),
                error: None,
            });
            report.last_applied = Some(index);
            report.observed = Some(after.clone());
            before = after;
        }

        report.duration_ms = start.elapsed().as_millis() as u64;
        Ok(report)
    }

    /// Execute one op, retrying transient failures with backoff.
    async fn run_op(&self, server_id: &str, op: &NetworkOp) -> Result<()> {
        let mut delay = self.retry.initial_delay;
        let mut attempt = 1;

        loop {
            let result = match *op {
                NetworkOp::AddInterface => self.transport.create_interface(server_id).await,
                NetworkOp::RemoveInterface { slot } => {
                    self.transport.delete_interface(server_id, slot).await
                }
                NetworkOp::ConnectShared => self.transport.connect_shared(server_id).await,
                NetworkOp::DisconnectShared => self.transport.disconnect_shared(server_id).await,
                NetworkOp::Connect { slot, switch } => {
                    self.transport.connect_switch(server_id, slot, switch).await
                }
                NetworkOp::Disconnect { slot } => {
                    self.transport.disconnect_switch(server_id, slot).await
                }
                NetworkOp::AttachFilter { slot, filter } => {
                    self.transport.attach_filter(server_id, slot, filter).await
                }
                NetworkOp::DetachFilter { slot } => {
                    self.transport.detach_filter(server_id, slot).await
                }
            };

            match result {
                Ok(()) => return Ok(()),
                Err(e) if e.is_transient() && attempt < self.retry.max_attempts => {
                    tracing::warn!(
                        server_id, %op, attempt, error = %e,
                        "transient failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    delay = std::cmp::min(
                        delay.mul_f64(self.retry.backoff_multiplier),
                        self.retry.max_delay,
                    );
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Whether a re-read interface list shows the op landed.
fn confirms(op: &NetworkOp, before: &ObservedServer, after: &ObservedServer) -> bool {
    match *op {
        NetworkOp::AddInterface => after.len() == before.len() + 1,
        NetworkOp::RemoveInterface { .. } => after.len() + 1 == before.len(),
        NetworkOp::ConnectShared => after
            .slot(0)
            .and_then(|i| i.switch)
            .is_some_and(|b| b.is_shared()),
        NetworkOp::DisconnectShared | NetworkOp::Disconnect { .. } => {
            let slot = match *op {
                NetworkOp::Disconnect { slot } => slot,
                _ => 0,
            };
            after.slot(slot).is_some_and(|i| i.switch.is_none())
        }
        NetworkOp::Connect { slot, switch } => after
            .slot(slot)
            .and_then(|i| i.switch)
            .is_some_and(|b| !b.is_shared() && b.id == switch),
        NetworkOp::AttachFilter { slot, filter } => after
            .slot(slot)
            .is_some_and(|i| i.packet_filter == Some(filter)),
        NetworkOp::DetachFilter { slot } => {
            after.slot(slot).is_some_and(|i| i.packet_filter.is_none())
        }
    }
}
