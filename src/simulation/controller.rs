//! Adaptive signal-timing controller
//!
//! The controller reads per-pair queue lengths and average speeds once per
//! cycle, allocates the variable green-time budget proportionally to
//! congestion, and drives the red/green/yellow phase machine. It is an
//! explicit state machine advanced by the tick loop; no phase is ever
//! preempted once entered.

use anyhow::Result;
use log::{debug, info, warn};
use std::time::Duration;

use super::metrics::{TrafficData, TrafficSnapshot, TrafficSource};
use super::types::LightState;

/// Fixed durations bounding phase lengths
#[derive(Debug, Clone, Copy)]
pub struct ControllerConfig {
    /// Lower bound on a pair's green phase
    pub min_green: Duration,
    /// Upper bound on a pair's green phase
    pub max_green: Duration,
    /// Fixed duration of every yellow phase
    pub yellow: Duration,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            min_green: Duration::from_millis(5000),
            max_green: Duration::from_millis(30000),
            yellow: Duration::from_millis(3000),
        }
    }
}

/// One contiguous interval of the four-phase signal cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NsGreen,
    NsYellow,
    EwGreen,
    EwYellow,
}

impl Phase {
    /// The phase that follows this one; the cycle never skips a yellow
    pub fn next(self) -> Phase {
        match self {
            Phase::NsGreen => Phase::NsYellow,
            Phase::NsYellow => Phase::EwGreen,
            Phase::EwGreen => Phase::EwYellow,
            Phase::EwYellow => Phase::NsGreen,
        }
    }

    /// Light states (ns, ew) displayed during this phase
    pub fn lights(self) -> (LightState, LightState) {
        match self {
            Phase::NsGreen => (LightState::Green, LightState::Red),
            Phase::NsYellow => (LightState::Yellow, LightState::Red),
            Phase::EwGreen => (LightState::Red, LightState::Green),
            Phase::EwYellow => (LightState::Red, LightState::Yellow),
        }
    }
}

/// Receiver for controller output: light states on every transition and the
/// cycle-start snapshot once per cycle (for display and charting)
pub trait LightSink {
    fn set_lights(&mut self, ns: LightState, ew: LightState) -> Result<()>;
    fn record_cycle(&mut self, data: &TrafficData) -> Result<()>;
}

/// Congestion score for one pair
///
/// More waiting vehicles and lower throughput speed raise the score. The
/// +0.1 keeps the speed term finite for a standing queue; an empty pair
/// scores zero so it never draws green time away from live traffic.
fn congestion_score(snapshot: &TrafficSnapshot) -> f64 {
    if snapshot.count == 0 {
        return 0.0;
    }
    snapshot.waiting as f64 * 2.0 + 1.0 / (snapshot.avg_speed as f64 + 0.1)
}

/// Compute (ns, ew) green durations for one cycle
///
/// The variable budget `max_green - min_green` is split proportionally to
/// the pair scores, clamped to `max_green`. An empty intersection (zero
/// combined score) gets `min_green` for both pairs.
pub fn green_times(config: &ControllerConfig, data: &TrafficData) -> (Duration, Duration) {
    let ns_score = congestion_score(&data.ns);
    let ew_score = congestion_score(&data.ew);
    let total = ns_score + ew_score;

    if total == 0.0 {
        return (config.min_green, config.min_green);
    }

    let min = config.min_green.as_secs_f64();
    let max = config.max_green.as_secs_f64();
    let variable = max - min;

    let ns = (min + variable * ns_score / total).min(max);
    let ew = (min + variable * ew_score / total).min(max);
    (Duration::from_secs_f64(ns), Duration::from_secs_f64(ew))
}

/// The adaptive signal controller
///
/// Starts the cycle at NS-green on the first update, re-plans green times at
/// every cycle start, and honors a stop request at the next phase boundary
/// by setting both pairs red.
pub struct SignalController {
    config: ControllerConfig,
    phase: Option<Phase>,
    /// Seconds left in the current phase
    remaining: f32,
    /// Green durations planned at the current cycle's start (ns, ew)
    planned_greens: (Duration, Duration),
    stop_requested: bool,
    halted: bool,
}

impl SignalController {
    pub fn new(config: ControllerConfig) -> Self {
        let min_green = config.min_green;
        Self {
            config,
            phase: None,
            remaining: 0.0,
            planned_greens: (min_green, min_green),
            stop_requested: false,
            halted: false,
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Current phase, None before the first update and after a halt
    pub fn phase(&self) -> Option<Phase> {
        self.phase
    }

    /// Light states currently commanded; both red outside a running cycle
    pub fn current_lights(&self) -> (LightState, LightState) {
        match self.phase {
            Some(phase) => phase.lights(),
            None => (LightState::Red, LightState::Red),
        }
    }

    /// Seconds left in the current phase
    pub fn time_remaining(&self) -> f32 {
        self.remaining.max(0.0)
    }

    /// Green durations planned for the current cycle (ns, ew)
    pub fn planned_greens(&self) -> (Duration, Duration) {
        self.planned_greens
    }

    /// Ask the controller to halt at the next phase boundary
    pub fn request_stop(&mut self) {
        self.stop_requested = true;
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Advance the controller by `delta_secs` of simulated time
    ///
    /// `io` supplies the traffic snapshot and receives light-state changes.
    /// Any error from it is logged and the cycle proceeds with conservative
    /// defaults; no error terminates the phase machine.
    pub fn update<T>(&mut self, delta_secs: f32, io: &mut T)
    where
        T: TrafficSource + LightSink + ?Sized,
    {
        if self.halted {
            return;
        }

        if self.phase.is_none() {
            // First update: plan the opening cycle and enter NS-green.
            self.plan_cycle(io);
            self.enter(Phase::NsGreen, io);
        }

        self.remaining -= delta_secs;

        let Some(mut phase) = self.phase else {
            return;
        };
        while self.remaining <= 0.0 {
            // Phase boundary: the only point where a stop takes effect.
            if self.stop_requested {
                self.halt(io);
                return;
            }

            phase = phase.next();
            if phase == Phase::NsGreen {
                self.plan_cycle(io);
            }
            self.enter(phase, io);
        }
    }

    /// Take the cycle-start snapshot and plan green durations from it
    fn plan_cycle<T>(&mut self, io: &mut T)
    where
        T: TrafficSource + LightSink + ?Sized,
    {
        let data = match io.traffic_snapshot() {
            Ok(data) => data,
            Err(err) => {
                warn!("traffic snapshot unavailable, treating as empty: {err:#}");
                TrafficData::default()
            }
        };

        self.planned_greens = green_times(&self.config, &data);
        debug!(
            "cycle planned: ns green {:.1}s, ew green {:.1}s (ns {:?}, ew {:?})",
            self.planned_greens.0.as_secs_f32(),
            self.planned_greens.1.as_secs_f32(),
            data.ns,
            data.ew
        );

        if let Err(err) = io.record_cycle(&data) {
            warn!("failed to publish cycle metrics: {err:#}");
        }
    }

    /// Enter a phase: push its light states and start its timer
    fn enter<T>(&mut self, phase: Phase, io: &mut T)
    where
        T: TrafficSource + LightSink + ?Sized,
    {
        let (ns, ew) = phase.lights();
        if let Err(err) = io.set_lights(ns, ew) {
            warn!("failed to apply light states for {phase:?}: {err:#}");
        }

        let duration = match phase {
            Phase::NsGreen => self.planned_greens.0,
            Phase::EwGreen => self.planned_greens.1,
            Phase::NsYellow | Phase::EwYellow => self.config.yellow,
        };

        info!(
            "switching lights: {:?} for {:.1}s (ns {:?}, ew {:?})",
            phase,
            duration.as_secs_f32(),
            ns,
            ew
        );

        self.phase = Some(phase);
        // Carry leftover time so phase lengths stay exact across ticks.
        self.remaining += duration.as_secs_f32();
    }

    /// Halt with both pairs red, the safe terminal state
    fn halt<T>(&mut self, io: &mut T)
    where
        T: TrafficSource + LightSink + ?Sized,
    {
        if let Err(err) = io.set_lights(LightState::Red, LightState::Red) {
            warn!("failed to apply all-red halt state: {err:#}");
        }
        self.phase = None;
        self.halted = true;
        info!("signal controller halted, both pairs red");
    }
}
