//! One-call simulation pipeline.
//!
//! Runs feasibility analysis, the simulation, metrics and every anomaly
//! detector for a configuration, and bundles the results into a
//! serializable [`SimulationReport`] for an external presenter.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::{assess_feasibility, AnomalyReport, FeasibilityReport};
use crate::config::SimulationConfig;
use crate::diagnostics::Diagnostic;
use crate::dispatching::Policy;
use crate::models::{ExecutionTrace, Time};
use crate::scheduler::{SimulationMetrics, Simulator};
use crate::timeline::Timeline;

/// Everything produced by one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    /// Policy that was simulated.
    pub policy: Policy,
    /// Horizon in ticks.
    pub simulation_time: Time,
    /// Per-tick CPU occupancy.
    pub trace: ExecutionTrace,
    /// Turnaround, waiting and utilization figures.
    pub metrics: SimulationMetrics,
    /// Detector findings.
    pub anomalies: AnomalyReport,
    /// Schedulability test result (RM/EDF only).
    pub feasibility: Option<FeasibilityReport>,
    /// Non-fatal observations, feasibility warnings first.
    pub diagnostics: Vec<Diagnostic>,
    /// Per-task glyph rows.
    pub timeline: Timeline,
}

/// Runs a configuration end to end.
///
/// The configuration is assumed valid; loaders validate on construction.
///
/// # Example
/// ```
/// use u_cpusim::config::SimulationConfig;
/// use u_cpusim::dispatching::Policy;
/// use u_cpusim::models::Task;
/// use u_cpusim::simulate;
///
/// let config = SimulationConfig::new(
///     Policy::Fcfs,
///     vec![Task::new(0, 3), Task::new(1, 2).with_offset(1)],
///     5,
/// );
/// let report = simulate(&config);
/// assert!((report.metrics.avg_turnaround - 3.5).abs() < 1e-10);
/// ```
pub fn simulate(config: &SimulationConfig) -> SimulationReport {
    let feasibility = assess_feasibility(config.policy, &config.tasks);
    let mut diagnostics = Vec::new();
    if let Some(report) = &feasibility {
        info!(
            utilization = report.utilization,
            bound = report.bound,
            verdict = ?report.verdict,
            "feasibility assessed"
        );
        for diagnostic in report.diagnostics() {
            diagnostic.emit();
            diagnostics.push(diagnostic);
        }
    }

    let simulation = Simulator::new(config.policy).run_config(config);
    let metrics = SimulationMetrics::calculate(&simulation);
    let anomalies = AnomalyReport::analyze(&simulation, config.starvation_threshold);
    let timeline = Timeline::from_simulation(&simulation);
    diagnostics.extend(simulation.diagnostics);

    SimulationReport {
        policy: simulation.policy,
        simulation_time: simulation.simulation_time,
        trace: simulation.trace,
        metrics,
        anomalies,
        feasibility,
        diagnostics,
        timeline,
    }
}
