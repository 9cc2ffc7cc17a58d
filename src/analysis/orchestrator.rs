// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vibration project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Synchronous triaxial analysis guarded by a state machine

use chrono::Utc;
use log::{debug, info, warn};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Instant;

use super::{AnalysisError, AnalysisReport, Axis, AxisAnalysis, TriaxialSamples};
use crate::config::AnalysisConfig;
use crate::dose::{combined_vdv, AxisDose};
use crate::preprocessing::weight_spectrum;
use crate::spectral::{FftAnalyzer, SpectralAnalyzer, WindowFunction};

/// Lifecycle of the analysis held by an orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalysisState {
    /// No analysis has run yet
    #[default]
    Idle,
    /// An analysis is running; new requests are rejected
    Computing,
    /// The last analysis completed
    Ready,
    /// The last analysis was rejected or failed
    Failed,
}

/// Runs the per-axis pipeline on triaxial samples
///
/// The orchestrator itself can be shared between threads. Only one analysis
/// runs at a time: a call made while another is computing fails with
/// [`AnalysisError::Busy`] and leaves the running analysis untouched.
///
/// ```
/// use rust_vibration::analysis::{AnalysisOrchestrator, AnalysisState, TriaxialSamples};
/// use rust_vibration::config::AnalysisConfig;
///
/// let orchestrator = AnalysisOrchestrator::new(AnalysisConfig::default());
/// let samples = TriaxialSamples::new(vec![0.1; 200], vec![0.2; 200], vec![0.3; 200], 100.0);
///
/// let report = orchestrator.analyze(&samples).unwrap();
/// assert_eq!(report.sample_count, 200);
/// assert_eq!(orchestrator.state(), AnalysisState::Ready);
/// ```
pub struct AnalysisOrchestrator {
    config: AnalysisConfig,
    state: Mutex<AnalysisState>,
}

impl AnalysisOrchestrator {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            state: Mutex::new(AnalysisState::Idle),
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Current state of the orchestrator
    pub fn state(&self) -> AnalysisState {
        *self.lock_state()
    }

    fn lock_state(&self) -> MutexGuard<'_, AnalysisState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Analyze the three axes of `samples`
    ///
    /// ### Errors
    ///
    /// * [`AnalysisError::Busy`] when another analysis is computing
    /// * [`AnalysisError::AxisLengthMismatch`] when the axes differ in length
    /// * [`AnalysisError::Transform`] when the FFT backend fails
    pub fn analyze(&self, samples: &TriaxialSamples) -> Result<AnalysisReport, AnalysisError> {
        let mut run = self.begin()?;

        let result = self.run(samples);
        run.finish(result.is_ok());

        result
    }

    /// Atomically move into `Computing`
    fn begin(&self) -> Result<ComputingRun<'_>, AnalysisError> {
        let mut state = self.lock_state();
        if *state == AnalysisState::Computing {
            warn!("Analysis request rejected, another analysis is in progress");
            return Err(AnalysisError::Busy);
        }
        *state = AnalysisState::Computing;
        Ok(ComputingRun {
            state: &self.state,
            finished: false,
        })
    }

    fn run(&self, samples: &TriaxialSamples) -> Result<AnalysisReport, AnalysisError> {
        let sample_count = samples.common_len().ok_or_else(|| {
            let [x, y, z] = samples.lengths();
            warn!("Axis lengths differ: x={}, y={}, z={}", x, y, z);
            AnalysisError::AxisLengthMismatch { x, y, z }
        })?;

        let started = Instant::now();
        debug!(
            "Analyzing {} samples per axis at {} Hz with {} weighting",
            sample_count, samples.sample_rate, self.config.weighting
        );

        let (x, y, z) = if self.config.parallel_axes {
            thread::scope(|scope| {
                let x = scope.spawn(|| self.analyze_axis(Axis::X, samples));
                let y = scope.spawn(|| self.analyze_axis(Axis::Y, samples));
                let z = self.analyze_axis(Axis::Z, samples);
                (join_axis(x), join_axis(y), z)
            })
        } else {
            (
                self.analyze_axis(Axis::X, samples),
                self.analyze_axis(Axis::Y, samples),
                self.analyze_axis(Axis::Z, samples),
            )
        };
        let (x, y, z) = (x?, y?, z?);

        let vdv_total = if self.config.weighting.is_weighted() {
            combined_vdv([x.vdv(), y.vdv(), z.vdv()])
        } else {
            None
        };

        info!(
            "Analysis of {} samples completed in {:.1} ms",
            sample_count,
            started.elapsed().as_secs_f64() * 1000.0
        );

        Ok(AnalysisReport {
            weighting: self.config.weighting,
            sample_rate: samples.sample_rate,
            sample_count,
            mtvv_window_seconds: self.config.mtvv_window_seconds,
            x,
            y,
            z,
            vdv_total,
            timestamp: Utc::now(),
        })
    }

    /// Spectrum, weighted series and dose values of one axis
    pub fn analyze_axis(
        &self,
        axis: Axis,
        samples: &TriaxialSamples,
    ) -> Result<AxisAnalysis, AnalysisError> {
        let series = samples.samples(axis);
        let sample_rate = samples.sample_rate;
        let transform_error = |source| AnalysisError::Transform { axis, source };

        // The weighting path needs the unwindowed transform
        let analyzer = FftAnalyzer::new();
        let raw_spectrum = analyzer
            .forward_transform(series, sample_rate)
            .map_err(transform_error)?;

        let spectrum = match self.config.display_window {
            WindowFunction::Rectangular => raw_spectrum.clone(),
            window => analyzer
                .with_window(window)
                .forward_transform(series, sample_rate)
                .map_err(transform_error)?,
        };

        let kind = self.config.weighting;
        if !kind.is_weighted() {
            return Ok(AxisAnalysis {
                axis,
                spectrum,
                weighted_spectrum: None,
                weighted_series: None,
                dose: None,
            });
        }

        let (weighted_spectrum, weighted_series) =
            if sample_rate > 0.0 && sample_rate.is_finite() {
                let weighted = weight_spectrum(&raw_spectrum, kind);
                let series = analyzer
                    .inverse_transform(&weighted, series.len())
                    .map_err(transform_error)?;
                (Some(weighted), series)
            } else {
                warn!(
                    "Axis {}: sample rate {} Hz is invalid, dose computed on the unweighted signal",
                    axis, sample_rate
                );
                (None, series.to_vec())
            };

        let dose = AxisDose::evaluate(
            &weighted_series,
            sample_rate,
            self.config.mtvv_window_seconds,
        );
        debug!("Axis {}: {:?}", axis, dose);

        Ok(AxisAnalysis {
            axis,
            spectrum,
            weighted_spectrum,
            weighted_series: self.config.keep_weighted_series.then_some(weighted_series),
            dose: Some(dose),
        })
    }
}

fn join_axis<T>(handle: thread::ScopedJoinHandle<'_, T>) -> T {
    handle
        .join()
        .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
}

/// Marks the end of a computation, `Failed` unless explicitly finished
///
/// A panic inside an axis unwinds through this guard, so the orchestrator
/// never stays stuck in `Computing`.
struct ComputingRun<'a> {
    state: &'a Mutex<AnalysisState>,
    finished: bool,
}

impl ComputingRun<'_> {
    fn finish(&mut self, success: bool) {
        let next = if success {
            AnalysisState::Ready
        } else {
            AnalysisState::Failed
        };
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = next;
        self.finished = true;
    }
}

impl Drop for ComputingRun<'_> {
    fn drop(&mut self) {
        if !self.finished {
            *self.state.lock().unwrap_or_else(PoisonError::into_inner) = AnalysisState::Failed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocessing::FrequencyWeighting;
    use std::f64::consts::PI;
    use std::sync::Arc;

    fn tone(frequency: f64, amplitude: f64, sample_rate: f64, len: usize) -> Vec<f64> {
        (0..len)
            .map(|i| amplitude * (2.0 * PI * frequency * i as f64 / sample_rate).sin())
            .collect()
    }

    fn config(weighting: FrequencyWeighting) -> AnalysisConfig {
        AnalysisConfig {
            weighting,
            ..AnalysisConfig::default()
        }
    }

    #[test]
    fn test_state_transitions() {
        let orchestrator = AnalysisOrchestrator::new(AnalysisConfig::default());
        assert_eq!(orchestrator.state(), AnalysisState::Idle);

        let bad = TriaxialSamples::new(vec![0.0; 10], vec![0.0; 9], vec![0.0; 10], 10.0);
        assert_eq!(
            orchestrator.analyze(&bad),
            Err(AnalysisError::AxisLengthMismatch { x: 10, y: 9, z: 10 })
        );
        assert_eq!(orchestrator.state(), AnalysisState::Failed);

        let good = TriaxialSamples::new(vec![0.0; 10], vec![0.0; 10], vec![0.0; 10], 10.0);
        assert!(orchestrator.analyze(&good).is_ok());
        assert_eq!(orchestrator.state(), AnalysisState::Ready);
    }

    #[test]
    fn test_busy_rejection() {
        let orchestrator = AnalysisOrchestrator::new(AnalysisConfig::default());
        let mut run = orchestrator.begin().unwrap();
        assert_eq!(orchestrator.state(), AnalysisState::Computing);

        let samples = TriaxialSamples::new(vec![1.0; 8], vec![1.0; 8], vec![1.0; 8], 8.0);
        assert_eq!(orchestrator.analyze(&samples), Err(AnalysisError::Busy));
        // The rejected call does not disturb the running analysis
        assert_eq!(orchestrator.state(), AnalysisState::Computing);

        run.finish(true);
        assert_eq!(orchestrator.state(), AnalysisState::Ready);
        assert!(orchestrator.analyze(&samples).is_ok());
    }

    #[test]
    fn test_abandoned_run_marks_failed() {
        let orchestrator = AnalysisOrchestrator::new(AnalysisConfig::default());
        drop(orchestrator.begin().unwrap());
        assert_eq!(orchestrator.state(), AnalysisState::Failed);
    }

    #[test]
    fn test_unweighted_analysis_has_no_dose() {
        let orchestrator = AnalysisOrchestrator::new(config(FrequencyWeighting::None));
        let samples = TriaxialSamples::new(
            tone(5.0, 1.0, 100.0, 200),
            tone(5.0, 2.0, 100.0, 200),
            tone(5.0, 3.0, 100.0, 200),
            100.0,
        );
        let report = orchestrator.analyze(&samples).unwrap();

        assert_eq!(report.vdv_total, None);
        for (axis, amplitude) in report.axes().into_iter().zip([1.0, 2.0, 3.0]) {
            assert!(axis.dose.is_none());
            assert!(axis.weighted_series.is_none());
            assert!((axis.spectrum.amplitude_at(5.0).unwrap() - amplitude).abs() < 1e-9);
        }
        assert_eq!(report.frequencies().len(), 100);
    }

    #[test]
    fn test_weighted_analysis_matches_dose_of_weighted_series() {
        let sample_rate = 64.0;
        let orchestrator = AnalysisOrchestrator::new(config(FrequencyWeighting::Wd));
        let samples = TriaxialSamples::new(
            tone(4.0, 1.0, sample_rate, 256),
            tone(1.5, 1.0, sample_rate, 256),
            vec![0.0; 256],
            sample_rate,
        );
        let report = orchestrator.analyze(&samples).unwrap();

        // Wd: 4 Hz at 0.5, 1.5 Hz at 1.0
        let x_dose = report.x.dose.unwrap();
        let y_dose = report.y.dose.unwrap();
        assert!((x_dose.rms.unwrap() - 0.5 / 2f64.sqrt()).abs() < 1e-6);
        assert!((y_dose.rms.unwrap() - 1.0 / 2f64.sqrt()).abs() < 1e-6);
        assert_eq!(report.z.dose.unwrap().rms, Some(0.0));

        let x_series = report.x.weighted_series.as_ref().unwrap();
        assert_eq!(x_series.len(), 256);
        assert_eq!(x_dose.vdv, Some(crate::dose::vdv(x_series, sample_rate)));

        let expected_total = crate::dose::vdv_total(&[
            x_dose.vdv.unwrap(),
            y_dose.vdv.unwrap(),
            0.0,
        ]);
        assert!((report.vdv_total.unwrap() - expected_total).abs() < 1e-12);
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let samples = TriaxialSamples::new(
            tone(3.0, 0.7, 50.0, 333),
            tone(7.0, 0.4, 50.0, 333),
            tone(12.0, 1.1, 50.0, 333),
            50.0,
        );
        let parallel = AnalysisOrchestrator::new(AnalysisConfig::default())
            .analyze(&samples)
            .unwrap();
        let sequential = AnalysisOrchestrator::new(AnalysisConfig {
            parallel_axes: false,
            ..AnalysisConfig::default()
        })
        .analyze(&samples)
        .unwrap();

        assert_eq!(parallel.x, sequential.x);
        assert_eq!(parallel.y, sequential.y);
        assert_eq!(parallel.z, sequential.z);
        assert_eq!(parallel.vdv_total, sequential.vdv_total);
    }

    #[test]
    fn test_invalid_rate_degrades_softly() {
        let orchestrator = AnalysisOrchestrator::new(AnalysisConfig::default());
        let samples = TriaxialSamples::new(vec![1.0, -1.0], vec![2.0, -2.0], vec![0.0, 0.0], 0.0);
        let report = orchestrator.analyze(&samples).unwrap();

        let dose = report.x.dose.unwrap();
        assert_eq!(dose.rms, Some(1.0));
        assert_eq!(dose.vdv, None);
        assert_eq!(dose.mtvv, None);
        assert!(report.x.weighted_spectrum.is_none());
        assert_eq!(report.x.weighted_series.as_deref(), Some(&[1.0, -1.0][..]));
        assert_eq!(report.vdv_total, None);
    }

    #[test]
    fn test_empty_input() {
        let orchestrator = AnalysisOrchestrator::new(AnalysisConfig::default());
        let report = orchestrator
            .analyze(&TriaxialSamples::new(vec![], vec![], vec![], 100.0))
            .unwrap();
        assert_eq!(report.sample_count, 0);
        assert!(report.frequencies().is_empty());
        assert_eq!(report.x.dose, Some(AxisDose::default()));
        assert_eq!(report.vdv_total, None);
    }

    #[test]
    fn test_short_series_has_no_mtvv() {
        let orchestrator = AnalysisOrchestrator::new(AnalysisConfig::default());
        let samples = TriaxialSamples::new(
            tone(5.0, 1.0, 100.0, 50),
            tone(5.0, 1.0, 100.0, 50),
            tone(5.0, 1.0, 100.0, 50),
            100.0,
        );
        let report = orchestrator.analyze(&samples).unwrap();
        let dose = report.z.dose.unwrap();
        assert!(dose.vdv.is_some());
        assert_eq!(dose.mtvv, None);
    }

    #[test]
    fn test_display_window_does_not_change_dose() {
        let samples = TriaxialSamples::new(
            tone(6.0, 1.0, 100.0, 300),
            tone(6.5, 1.0, 100.0, 300),
            tone(9.0, 1.0, 100.0, 300),
            100.0,
        );
        let rectangular = AnalysisOrchestrator::new(AnalysisConfig::default())
            .analyze(&samples)
            .unwrap();
        let hann = AnalysisOrchestrator::new(AnalysisConfig {
            display_window: WindowFunction::Hann,
            keep_weighted_series: false,
            ..AnalysisConfig::default()
        })
        .analyze(&samples)
        .unwrap();

        assert_ne!(rectangular.y.spectrum, hann.y.spectrum);
        assert_eq!(rectangular.y.dose, hann.y.dose);
        assert_eq!(rectangular.y.weighted_spectrum, hann.y.weighted_spectrum);
        assert!(hann.y.weighted_series.is_none());
    }

    #[test]
    fn test_shared_between_threads() {
        let orchestrator = Arc::new(AnalysisOrchestrator::new(AnalysisConfig::default()));
        let samples = TriaxialSamples::new(vec![0.5; 400], vec![0.5; 400], vec![0.5; 400], 100.0);

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let orchestrator = Arc::clone(&orchestrator);
                let samples = samples.clone();
                thread::spawn(move || orchestrator.analyze(&samples))
            })
            .collect();

        for handle in handles {
            match handle.join().unwrap() {
                Ok(report) => assert_eq!(report.sample_count, 400),
                Err(err) => assert_eq!(err, AnalysisError::Busy),
            }
        }
        assert_eq!(orchestrator.state(), AnalysisState::Ready);
    }
}
