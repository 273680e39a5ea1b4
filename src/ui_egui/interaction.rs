//! Interaction state machine for rescheduling appointments on the grid.
//!
//! `Idle -> (PointerDragActive | MoveSelected) -> Committed | Cancelled -> Idle`
//!
//! Every pointer move re-snaps, re-classifies and updates the session
//! candidate; the [`HoverCoordinator`] decides whether the host hears about
//! it. A commit emits exactly one [`MoveCommit`] and a cancellation exactly
//! one `on_session_cancelled`. The appointment list is read fresh from the
//! [`AppointmentSource`] on every check, always excluding the frozen
//! snapshot's id.

use chrono::{NaiveDate, NaiveTime};

use super::drag::{InteractionState, Session, SessionKind};
use super::events::{CandidatePreview, CellTarget, GridEventSink, MoveCommit, PointerEvent};
use super::hover::HoverCoordinator;
use crate::error::SchedulingError;
use crate::models::appointment::{Appointment, AppointmentId, RoomId};
use crate::models::grid::CandidateSlot;
use crate::models::settings::GridSettings;
use crate::services::scheduling::conflict::{check_placement, find_conflict, occupied_at};
use crate::services::scheduling::{
    classify, AppointmentSource, Placement, SnapBounds, Snapper, TimeGrid, ZoneType,
};
use crate::utils::date::{footprint_end, minutes_of_day, time_from_minutes, MINUTES_PER_DAY};

/// How a session ended
#[derive(Clone, Debug, PartialEq)]
pub enum SessionOutcome {
    Committed(MoveCommit),
    Cancelled {
        appointment_id: AppointmentId,
        /// Why a drop was refused; `None` for an explicit cancel
        reason: Option<SchedulingError>,
    },
}

impl SessionOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, SessionOutcome::Committed(_))
    }
}

pub struct InteractionController<S: GridEventSink> {
    grid: TimeGrid,
    settings: GridSettings,
    hover_snapper: Snapper,
    move_snapper: Snapper,
    hover: HoverCoordinator,
    state: InteractionState,
    sink: S,
}

impl<S: GridEventSink> InteractionController<S> {
    pub fn new(grid: TimeGrid, settings: GridSettings, sink: S) -> Result<Self, SchedulingError> {
        settings.validate()?;
        let slot_duration = grid.geometry().slot_duration();
        if slot_duration != settings.slot_duration {
            return Err(SchedulingError::invalid(format!(
                "grid slot duration {} differs from settings {}",
                slot_duration, settings.slot_duration
            )));
        }

        Ok(Self {
            hover_snapper: Snapper::new(settings.minute_granularity, slot_duration)?,
            move_snapper: Snapper::new(settings.move_granularity, slot_duration)?,
            grid,
            settings,
            hover: HoverCoordinator::new(),
            state: InteractionState::Idle,
            sink,
        })
    }

    pub fn grid(&self) -> &TimeGrid {
        &self.grid
    }

    pub fn settings(&self) -> &GridSettings {
        &self.settings
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn active_kind(&self) -> Option<SessionKind> {
        self.state.kind()
    }

    pub fn candidate(&self) -> Option<&CandidateSlot> {
        self.state.session()?.candidate.as_ref()
    }

    pub fn hover(&self) -> &HoverCoordinator {
        &self.hover
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Start a pointer drag. `grab_offset_px` is where the pointer grabbed
    /// the appointment, measured from its top edge.
    pub fn begin_drag(&mut self, appointment: &Appointment, grab_offset_px: f32) -> Result<(), SchedulingError> {
        self.ensure_idle()?;
        appointment.validate()?;

        let grab = self
            .grid
            .geometry()
            .pixels_to_minutes(grab_offset_px.max(0.0))
            .round() as i32;
        let grab = grab.min(footprint_end(0, appointment.duration_minutes));

        self.start_feedback();
        self.state = InteractionState::PointerDragActive(Session::new(appointment, grab));
        log::debug!(
            "Drag started for appointment {} (grab offset {}m)",
            appointment.id,
            grab
        );
        Ok(())
    }

    /// Mark an appointment to be moved by the next valid click
    pub fn begin_move(&mut self, appointment: &Appointment) -> Result<(), SchedulingError> {
        self.ensure_idle()?;
        appointment.validate()?;

        self.start_feedback();
        self.state = InteractionState::MoveSelected(Session::new(appointment, 0));
        log::debug!("Appointment {} selected for move", appointment.id);
        Ok(())
    }

    /// Handle a pointer move. Returns the preview passed on to the sink, if
    /// it changed.
    pub fn pointer_moved(
        &mut self,
        event: &PointerEvent,
        source: &dyn AppointmentSource,
    ) -> Result<Option<CandidatePreview>, SchedulingError> {
        match self.state.kind() {
            None => self.idle_hover(event, source),
            Some(SessionKind::PointerDrag) => self.drag_update(event, source),
            Some(SessionKind::MoveSelected) => self.move_preview(event, source),
        }
    }

    /// The pointer left the grid: hide the preview. An active drag keeps
    /// its last known candidate for the drop.
    pub fn pointer_left(&mut self) {
        self.clear_preview();
    }

    /// Click on a cell while an appointment is selected for moving.
    ///
    /// A rejected click leaves the session in `MoveSelected` and returns the
    /// reason. A click outside the grid is ignored.
    pub fn click(
        &mut self,
        event: &PointerEvent,
        source: &dyn AppointmentSource,
    ) -> Result<Option<MoveCommit>, SchedulingError> {
        let session = match &self.state {
            InteractionState::MoveSelected(session) => session,
            _ => return Err(SchedulingError::NoActiveSession),
        };
        let (target, offset_px) = match (&event.target, event.offset_px()) {
            (Some(target), Some(offset_px)) => (target, offset_px),
            _ => return Ok(None),
        };
        let cell = &target.cell;

        if !target.availability.accepts_drop() {
            let err = SchedulingError::CellUnavailable {
                date: cell.date,
                time: cell.time,
                room_id: cell.room_id.clone(),
            };
            log::info!("Move click rejected: {}", err);
            return Err(err);
        }

        let raw = self.grid.geometry().pixels_to_minutes(offset_px);
        let offset = self.move_snapper.snap(raw, SnapBounds::Cell)?;
        let time = self
            .grid
            .geometry()
            .time_at(cell.time, offset)
            .map_err(|_| SchedulingError::OutsideBusinessHours {
                time: cell.time,
                duration_minutes: session.snapshot.duration_minutes,
            })?;

        if session.is_origin(cell.date, time, &cell.room_id) {
            let err = SchedulingError::SamePosition(session.appointment_id().clone());
            log::info!("Move click rejected: {}", err);
            return Err(err);
        }

        let existing = source.appointments_for_day(cell.date);
        if let Err(err) = self.validate_target(&session.snapshot, cell.date, time, &cell.room_id, &existing) {
            log::info!("Move click rejected: {}", err);
            return Err(err);
        }

        let (date, room_id) = (cell.date, cell.room_id.clone());
        let Some((_, session)) = self.state.take() else {
            return Err(SchedulingError::NoActiveSession);
        };
        Ok(Some(self.commit(session, date, time, room_id)))
    }

    /// Drop the dragged appointment. Anything but a valid, non-blocked
    /// candidate cancels the session.
    pub fn drop(
        &mut self,
        event: &PointerEvent,
        source: &dyn AppointmentSource,
    ) -> Result<SessionOutcome, SchedulingError> {
        if self.state.kind() != Some(SessionKind::PointerDrag) {
            return Err(SchedulingError::NoActiveSession);
        }

        if let Some(target) = &event.target {
            if !target.availability.accepts_drop() {
                let err = SchedulingError::CellUnavailable {
                    date: target.cell.date,
                    time: target.cell.time,
                    room_id: target.cell.room_id.clone(),
                };
                let (_, session) = self.state.take().ok_or(SchedulingError::NoActiveSession)?;
                return Ok(self.finish_cancelled(session, Some(err)));
            }
            self.drag_update(event, source)?;
        }

        let Some((_, session)) = self.state.take() else {
            return Err(SchedulingError::NoActiveSession);
        };
        let (candidate, zone) = match (session.candidate.clone(), session.zone) {
            (Some(candidate), Some(zone)) => (candidate, zone),
            _ => return Ok(self.finish_cancelled(session, None)),
        };
        let existing = source.appointments_for_day(candidate.date);

        if zone == ZoneType::Blocked {
            let placement = Placement::new(
                candidate.date,
                candidate.time,
                &candidate.room_id,
                session.snapshot.duration_minutes,
            );
            let reason = find_conflict(&placement, &existing, Some(session.appointment_id())).map(|apt| {
                SchedulingError::ConflictRejected {
                    date: candidate.date,
                    time: candidate.time,
                    room_id: candidate.room_id.clone(),
                    conflicting_id: apt.id.clone(),
                }
            });
            return Ok(self.finish_cancelled(session, reason));
        }

        if session.is_origin(candidate.date, candidate.time, &candidate.room_id) {
            let reason = SchedulingError::SamePosition(session.appointment_id().clone());
            return Ok(self.finish_cancelled(session, Some(reason)));
        }

        if let Err(err) = self.validate_target(
            &session.snapshot,
            candidate.date,
            candidate.time,
            &candidate.room_id,
            &existing,
        ) {
            return Ok(self.finish_cancelled(session, Some(err)));
        }

        let commit = self.commit(session, candidate.date, candidate.time, candidate.room_id);
        Ok(SessionOutcome::Committed(commit))
    }

    /// Abandon the active session, if any
    pub fn cancel(&mut self) -> Option<SessionOutcome> {
        let (_, session) = self.state.take()?;
        Some(self.finish_cancelled(session, None))
    }

    /// Escape cancels; other keys are ignored
    pub fn handle_key(&mut self, key: egui::Key) -> Option<SessionOutcome> {
        match key {
            egui::Key::Escape => self.cancel(),
            _ => None,
        }
    }

    fn ensure_idle(&self) -> Result<(), SchedulingError> {
        match (self.state.kind(), self.state.session()) {
            (Some(active), Some(session)) => {
                log::warn!(
                    "Rejected new session: {} session for {} still active",
                    active,
                    session.appointment_id()
                );
                Err(SchedulingError::SessionAlreadyActive {
                    active,
                    appointment_id: session.appointment_id().clone(),
                })
            }
            _ => Ok(()),
        }
    }

    fn start_feedback(&mut self) {
        self.clear_preview();
        self.hover.reset();
    }

    fn clear_preview(&mut self) {
        if self.hover.clear() {
            self.sink.on_preview_cleared();
        }
    }

    fn publish(&mut self, preview: CandidatePreview) -> Option<CandidatePreview> {
        if self.hover.offer(&preview) {
            self.sink.on_candidate_changed(&preview);
            Some(preview)
        } else {
            None
        }
    }

    fn available_target(event: &PointerEvent) -> Option<(&CellTarget, f32)> {
        let target = event.target.as_ref()?;
        if !target.availability.accepts_drop() {
            return None;
        }
        Some((target, event.offset_px()?))
    }

    fn preview_for(&self, target: &CellTarget, start: i32, zone: ZoneType) -> Result<CandidatePreview, SchedulingError> {
        let time = time_from_minutes(start)
            .ok_or_else(|| SchedulingError::invalid(format!("candidate start {start} is outside the day")))?;
        Ok(CandidatePreview {
            date: target.cell.date,
            room_id: target.cell.room_id.clone(),
            time,
            zone,
            pixel_offset: self
                .grid
                .geometry()
                .minutes_to_pixels(start - target.cell.start_minutes()),
        })
    }

    fn idle_hover(
        &mut self,
        event: &PointerEvent,
        source: &dyn AppointmentSource,
    ) -> Result<Option<CandidatePreview>, SchedulingError> {
        let Some((target, offset_px)) = Self::available_target(event) else {
            self.clear_preview();
            return Ok(None);
        };

        let raw = self.grid.geometry().pixels_to_minutes(offset_px);
        let offset = self.hover_snapper.snap(raw, SnapBounds::Cell)?;
        let start = target.cell.start_minutes() + offset;

        let outside_hours = self
            .settings
            .business_hours
            .as_ref()
            .is_some_and(|hours| !hours.contains(start));
        if outside_hours || time_from_minutes(start).is_none() {
            self.clear_preview();
            return Ok(None);
        }

        let existing = source.appointments_for_day(target.cell.date);
        if occupied_at(target.cell.date, &target.cell.room_id, start, &existing, None) {
            self.clear_preview();
            return Ok(None);
        }

        let preview = self.preview_for(target, start, ZoneType::Green)?;
        Ok(self.publish(preview))
    }

    fn move_preview(
        &mut self,
        event: &PointerEvent,
        source: &dyn AppointmentSource,
    ) -> Result<Option<CandidatePreview>, SchedulingError> {
        let Some((target, offset_px)) = Self::available_target(event) else {
            self.clear_preview();
            return Ok(None);
        };
        let Some(session) = self.state.session() else {
            return Err(SchedulingError::NoActiveSession);
        };

        let raw = self.grid.geometry().pixels_to_minutes(offset_px);
        let offset = self.move_snapper.snap(raw, SnapBounds::Cell)?;
        let start = target.cell.start_minutes() + offset;
        let Some(time) = time_from_minutes(start) else {
            self.clear_preview();
            return Ok(None);
        };

        let candidate = CandidateSlot {
            date: target.cell.date,
            time,
            room_id: target.cell.room_id.clone(),
            offset_minutes: offset,
        };
        let existing = source.appointments_for_day(candidate.date);
        let zone = classify(&candidate, &session.snapshot, &existing);

        let preview = self.preview_for(target, start, zone)?;
        Ok(self.publish(preview))
    }

    fn drag_update(
        &mut self,
        event: &PointerEvent,
        source: &dyn AppointmentSource,
    ) -> Result<Option<CandidatePreview>, SchedulingError> {
        if let Some(session) = self.state.session_mut() {
            session.track_pointer(event.pos.y);
        }

        let Some(target) = event.target.as_ref() else {
            return Ok(None);
        };
        let Some(offset_px) = event.offset_px().filter(|_| target.availability.accepts_drop()) else {
            if let Some(session) = self.state.session_mut() {
                session.candidate = None;
                session.zone = None;
            }
            self.clear_preview();
            return Ok(None);
        };
        let Some(session) = self.state.session() else {
            return Err(SchedulingError::NoActiveSession);
        };

        let raw = self.grid.geometry().pixels_to_minutes(offset_px) - session.grab_offset_minutes as f32;
        let offset = self.hover_snapper.snap(raw, SnapBounds::Unbounded)?;
        let start = self.hover_snapper.clamp_start(
            target.cell.start_minutes() + offset,
            self.settings.business_hours.as_ref(),
        );
        let start = self.clamp_to_grid(start);

        // The candidate may have flowed out of the hovered cell; it must
        // still land on a cell of the grid
        if self.grid.cell_for(target.cell.date, &target.cell.room_id, start).is_none() {
            return Ok(None);
        }
        let Some(time) = time_from_minutes(start) else {
            return Ok(None);
        };

        let candidate = CandidateSlot {
            date: target.cell.date,
            time,
            room_id: target.cell.room_id.clone(),
            offset_minutes: start - target.cell.start_minutes(),
        };
        let existing = source.appointments_for_day(candidate.date);
        let zone = classify(&candidate, &session.snapshot, &existing);

        let preview = self.preview_for(target, start, zone)?;
        if let Some(session) = self.state.session_mut() {
            session.set_candidate(candidate, zone);
        }
        Ok(self.publish(preview))
    }

    fn clamp_to_grid(&self, start: i32) -> i32 {
        let slots = self.grid.slots();
        let (Some(first), Some(last)) = (slots.first(), slots.last()) else {
            return start;
        };
        let g = self.hover_snapper.granularity() as i32;
        let lower = minutes_of_day(*first);
        let upper = minutes_of_day(*last) + self.grid.geometry().slot_duration() as i32 - g;
        start.clamp(lower, upper.max(lower))
    }

    /// Final checks before any commit: the footprint stays within the day
    /// and business hours and overlaps nothing but the moved appointment
    fn validate_target(
        &self,
        snapshot: &Appointment,
        date: NaiveDate,
        time: NaiveTime,
        room_id: &RoomId,
        existing: &[Appointment],
    ) -> Result<(), SchedulingError> {
        let start = minutes_of_day(time);
        let outside = SchedulingError::OutsideBusinessHours {
            time,
            duration_minutes: snapshot.duration_minutes,
        };
        if footprint_end(start, snapshot.duration_minutes) > MINUTES_PER_DAY {
            return Err(outside);
        }
        if let Some(hours) = &self.settings.business_hours {
            if !hours.contains_footprint(start, snapshot.duration_minutes) {
                return Err(outside);
            }
        }

        let placement = Placement::new(date, time, room_id, snapshot.duration_minutes);
        check_placement(&placement, existing, Some(&snapshot.id))
    }

    fn commit(&mut self, session: Session, date: NaiveDate, time: NaiveTime, room_id: RoomId) -> MoveCommit {
        let commit = MoveCommit {
            appointment_id: session.snapshot.id,
            new_date: date,
            new_time: time,
            new_room_id: room_id,
        };

        self.clear_preview();
        self.hover.reset();
        log::info!(
            "Committed move of {} to {} {} in room {}",
            commit.appointment_id,
            commit.new_date,
            commit.new_time,
            commit.new_room_id
        );
        self.sink.on_commit(&commit);
        commit
    }

    fn finish_cancelled(&mut self, session: Session, reason: Option<SchedulingError>) -> SessionOutcome {
        let appointment_id = session.snapshot.id;

        self.clear_preview();
        self.hover.reset();
        match &reason {
            Some(err) => log::info!("Session for {} cancelled: {}", appointment_id, err),
            None => log::debug!("Session for {} cancelled", appointment_id),
        }
        self.sink.on_session_cancelled(&appointment_id);
        SessionOutcome::Cancelled {
            appointment_id,
            reason,
        }
    }
}
