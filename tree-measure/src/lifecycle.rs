//! Tracking-session lifecycle and the serialized event stream.
//!
//! [`MeasurementController`] is the single writer for a measurement screen.
//! User input and tracking signals are both expressed as [`MeasureEvent`]s and
//! handled strictly in arrival order.

use crate::display::{self, DisplayUnit};
use crate::error::TrackingError;
use crate::session::{CaptureOutcome, MeasurementPhase, MeasurementSession, MeasurementState};
use crate::settings::{InterruptionPolicy, MeasureSettings, TrackingConfig};
use crate::spatial::SpatialQuery;
use crate::visual::Visualizer;
use bevy_math::Vec2;
use serde::Serialize;
use tracing::{debug, info, warn};

/// The tracking subsystem that feeds the spatial query.
pub trait TrackingBackend {
    /// Capability check performed before a session starts.
    fn is_supported(&self) -> bool;

    /// Arm (or re-arm) tracking with `config`. With `reset` the backend drops
    /// detected surfaces and re-bases its world origin.
    fn run(&mut self, config: &TrackingConfig, reset: bool);
}

/// Notifications coming from the tracking subsystem.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackingSignal {
    SurfaceDetected,
    Interrupted,
    InterruptionEnded,
    Failed { reason: String },
}

/// Everything that can mutate a measurement screen.
#[derive(Debug, Clone, PartialEq)]
pub enum MeasureEvent {
    Capture { location: Vec2 },
    Reset,
    Tracking(TrackingSignal),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingStatus {
    /// `start` has not been called yet.
    #[default]
    Uninitialized,
    Running,
    Interrupted,
    /// Capability check failed; nothing can be measured on this screen.
    Unsupported,
    /// Tracking failed; `start` must be called again.
    Failed,
}

/// A lifecycle error surfaced to the user, and whether it cleared the
/// measurement in progress.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionNotice {
    pub error: TrackingError,
    pub invalidated: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventOutcome {
    Capture(CaptureOutcome),
    Reset { cleared: bool },
    Notice(SessionNotice),
    /// Tracking resumed after an interruption.
    Restored,
    SurfaceDetected,
    /// The event did not apply in the current status.
    Unchanged,
}

/// Measurement session wrapped with tracking status. `M` and `S` are the
/// renderer's handle types.
#[derive(Debug)]
pub struct MeasurementController<M, S> {
    session: MeasurementSession<M, S>,
    settings: MeasureSettings,
    status: TrackingStatus,
    surface_detected: bool,
    last_error: Option<TrackingError>,
}

impl<M, S> MeasurementController<M, S> {
    pub fn new(settings: MeasureSettings) -> Self {
        Self {
            session: MeasurementSession::new(),
            settings,
            status: TrackingStatus::Uninitialized,
            surface_detected: false,
            last_error: None,
        }
    }

    pub fn session(&self) -> &MeasurementSession<M, S> {
        &self.session
    }

    pub fn state(&self) -> &MeasurementState {
        self.session.state()
    }

    pub fn phase(&self) -> MeasurementPhase {
        self.session.phase()
    }

    pub fn status(&self) -> TrackingStatus {
        self.status
    }

    pub fn settings(&self) -> &MeasureSettings {
        &self.settings
    }

    pub fn surface_detected(&self) -> bool {
        self.surface_detected
    }

    /// The most recent lifecycle error, cleared when tracking resumes.
    pub fn last_error(&self) -> Option<&TrackingError> {
        self.last_error.as_ref()
    }

    pub fn set_display_unit(&mut self, unit: DisplayUnit) {
        self.settings.display_unit = unit;
    }

    /// Current instruction or result line.
    pub fn prompt(&self) -> String {
        if let Some(error) = self.last_error.as_ref().filter(|e| e.is_fatal()) {
            return error.to_string();
        }
        display::prompt(
            self.session.state(),
            self.surface_detected,
            self.settings.display_unit,
            self.settings.decimal_places,
        )
    }

    /// Formatted distance of the completed measurement, if any.
    pub fn formatted_distance(&self) -> Option<String> {
        self.session.state().distance().map(|meters| {
            display::format_distance(
                meters,
                self.settings.display_unit,
                self.settings.decimal_places,
            )
        })
    }

    /// Check capability and arm tracking.
    ///
    /// Calling `start` again after a failure re-arms tracking from scratch.
    pub fn start<B>(&mut self, backend: &mut B) -> Result<(), TrackingError>
    where
        B: TrackingBackend + ?Sized,
    {
        if !backend.is_supported() {
            let error = TrackingError::Unsupported;
            warn!("{error}");
            self.status = TrackingStatus::Unsupported;
            self.last_error = Some(error.clone());
            return Err(error);
        }

        backend.run(&self.settings.tracking, true);
        self.status = TrackingStatus::Running;
        self.surface_detected = false;
        self.last_error = None;
        info!("Tracking session started");
        Ok(())
    }

    /// Apply one event from the serialized stream.
    pub fn handle<Q, V, B>(
        &mut self,
        event: MeasureEvent,
        query: &mut Q,
        visuals: &mut V,
        backend: &mut B,
    ) -> EventOutcome
    where
        Q: SpatialQuery + ?Sized,
        V: Visualizer<Marker = M, Segment = S> + ?Sized,
        B: TrackingBackend + ?Sized,
    {
        match event {
            MeasureEvent::Capture { location } => {
                EventOutcome::Capture(self.capture(query, location, visuals))
            }
            MeasureEvent::Reset => EventOutcome::Reset {
                cleared: self.reset(visuals),
            },
            MeasureEvent::Tracking(signal) => self.signal(signal, visuals, backend),
        }
    }

    pub fn capture<Q, V>(&mut self, query: &mut Q, location: Vec2, visuals: &mut V) -> CaptureOutcome
    where
        Q: SpatialQuery + ?Sized,
        V: Visualizer<Marker = M, Segment = S> + ?Sized,
    {
        if self.status != TrackingStatus::Running {
            debug!("Capture ignored while tracking is {:?}", self.status);
            return CaptureOutcome::Ignored;
        }

        let awaiting_point = !matches!(self.session.state(), MeasurementState::Complete(_));
        // Detection is recorded only by the SurfaceDetected signal.
        if awaiting_point && self.settings.require_surface_before_capture && !query.surface_detected() {
            debug!("Capture ignored: no surface detected yet");
            return CaptureOutcome::NoSurface;
        }

        self.session.capture(query, location, visuals)
    }

    /// Explicit reset; accepted in every status.
    pub fn reset<V>(&mut self, visuals: &mut V) -> bool
    where
        V: Visualizer<Marker = M, Segment = S> + ?Sized,
    {
        self.session.reset(visuals)
    }

    pub fn signal<V, B>(&mut self, signal: TrackingSignal, visuals: &mut V, backend: &mut B) -> EventOutcome
    where
        V: Visualizer<Marker = M, Segment = S> + ?Sized,
        B: TrackingBackend + ?Sized,
    {
        match (signal, self.status) {
            (TrackingSignal::SurfaceDetected, TrackingStatus::Running) => {
                if self.surface_detected {
                    return EventOutcome::Unchanged;
                }
                self.surface_detected = true;
                info!("Trackable surface detected");
                EventOutcome::SurfaceDetected
            }
            (TrackingSignal::Interrupted, TrackingStatus::Running) => {
                let error = TrackingError::Interrupted;
                warn!("{error}");
                self.status = TrackingStatus::Interrupted;
                let invalidated = match self.settings.interruption_policy {
                    InterruptionPolicy::Preserve => false,
                    InterruptionPolicy::Discard => self.session.invalidate(visuals, &error),
                };
                self.last_error = Some(error.clone());
                EventOutcome::Notice(SessionNotice { error, invalidated })
            }
            (TrackingSignal::InterruptionEnded, TrackingStatus::Interrupted) => {
                let reset = self.settings.interruption_policy == InterruptionPolicy::Discard;
                backend.run(&self.settings.tracking, reset);
                if reset {
                    self.surface_detected = false;
                }
                self.status = TrackingStatus::Running;
                self.last_error = None;
                info!("Tracking resumed (reset: {reset})");
                EventOutcome::Restored
            }
            (
                TrackingSignal::Failed { reason },
                TrackingStatus::Running | TrackingStatus::Interrupted,
            ) => {
                let error = TrackingError::Failed(reason);
                warn!("{error}");
                let invalidated = self.session.invalidate(visuals, &error);
                self.status = TrackingStatus::Failed;
                self.surface_detected = false;
                self.last_error = Some(error.clone());
                EventOutcome::Notice(SessionNotice { error, invalidated })
            }
            (signal, status) => {
                debug!("Ignoring {signal:?} while tracking is {status:?}");
                EventOutcome::Unchanged
            }
        }
    }
}
