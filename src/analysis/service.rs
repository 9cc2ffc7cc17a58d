// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vibration project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Asynchronous analysis submission
//!
//! The FFT cost grows with the recording length, so analyses run on tokio's
//! blocking pool instead of the async executor. Each submission gets a
//! generation number; when a result is delivered after a newer submission it
//! is reported as [`AnalysisOutcome::Superseded`] and never published.
//!
//! ```no_run
//! use rust_vibration::analysis::{AnalysisOutcome, AnalysisService, TriaxialSamples};
//! use rust_vibration::config::AnalysisConfig;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let service = AnalysisService::new(AnalysisConfig::default());
//! let samples = TriaxialSamples::new(vec![0.0; 1000], vec![0.0; 1000], vec![9.81; 1000], 100.0);
//!
//! if let AnalysisOutcome::Completed(report) = service.submit(&samples).outcome().await? {
//!     println!("VDV total: {:?}", report.vdv_total);
//! }
//! # Ok(())
//! # }
//! ```

use log::{debug, error};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::{AnalysisError, AnalysisOrchestrator, AnalysisReport, TriaxialSamples};
use crate::config::AnalysisConfig;

/// Result of a submitted analysis once delivered
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    /// The analysis is the latest one submitted
    Completed(Arc<AnalysisReport>),
    /// A newer analysis was submitted before this one was delivered
    Superseded,
}

/// Submits analyses to the blocking pool with last-request-wins delivery
pub struct AnalysisService {
    config: AnalysisConfig,
    /// Generation of the latest submission
    generation: Arc<AtomicU64>,
    latest: Arc<watch::Sender<Option<Arc<AnalysisReport>>>>,
}

impl AnalysisService {
    pub fn new(config: AnalysisConfig) -> Self {
        let (sender, _) = watch::channel(None);
        Self {
            config,
            generation: Arc::new(AtomicU64::new(0)),
            latest: Arc::new(sender),
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Submit a copy of `samples`
    ///
    /// Later changes to the caller's buffers do not affect the submitted
    /// analysis. Must be called from within a tokio runtime.
    pub fn submit(&self, samples: &TriaxialSamples) -> AnalysisTicket {
        self.submit_owned(samples.clone())
    }

    /// Submit samples the caller no longer needs
    pub fn submit_owned(&self, samples: TriaxialSamples) -> AnalysisTicket {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("Submitting analysis #{}", generation);

        // Each request gets its own orchestrator, nothing mutable is shared
        let orchestrator = AnalysisOrchestrator::new(self.config.clone());
        let latest_generation = Arc::clone(&self.generation);
        let latest = Arc::clone(&self.latest);

        let handle = tokio::task::spawn_blocking(move || -> Result<_, AnalysisError> {
            let report = Arc::new(orchestrator.analyze(&samples)?);

            // Checked under the channel lock so an older report can never
            // overwrite a newer one
            latest.send_if_modified(|current| {
                if latest_generation.load(Ordering::SeqCst) == generation {
                    *current = Some(Arc::clone(&report));
                    true
                } else {
                    false
                }
            });

            Ok(report)
        });

        AnalysisTicket {
            generation,
            latest_generation: Arc::clone(&self.generation),
            handle,
        }
    }

    /// Generation number of the latest submission, `0` before the first one
    pub fn latest_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Receiver notified with every published report
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<AnalysisReport>>> {
        self.latest.subscribe()
    }

    /// Latest published report
    pub fn latest(&self) -> Option<Arc<AnalysisReport>> {
        self.latest.borrow().clone()
    }
}

/// Pending analysis returned by [`AnalysisService::submit`]
pub struct AnalysisTicket {
    generation: u64,
    latest_generation: Arc<AtomicU64>,
    handle: JoinHandle<Result<Arc<AnalysisReport>, AnalysisError>>,
}

impl AnalysisTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Wait for the analysis and resolve it against newer submissions
    pub async fn outcome(self) -> Result<AnalysisOutcome, AnalysisError> {
        let report = self.handle.await.map_err(|e| {
            error!("Analysis task #{} failed: {}", self.generation, e);
            AnalysisError::TaskFailed(e.to_string())
        })??;

        if self.latest_generation.load(Ordering::SeqCst) == self.generation {
            Ok(AnalysisOutcome::Completed(report))
        } else {
            debug!("Analysis #{} superseded", self.generation);
            Ok(AnalysisOutcome::Superseded)
        }
    }
}
