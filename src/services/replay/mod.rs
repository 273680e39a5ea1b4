// Replay service
// Drives the interaction controller from a recorded JSON scenario, acting as
// the rendering layer (hit testing) and the appointment store (applying commits)

use anyhow::{anyhow, bail, Context, Result};
use chrono::{NaiveDate, NaiveTime};
use egui::Pos2;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::models::appointment::{Appointment, AppointmentId, RoomId};
use crate::models::grid::{CellAvailability, CellCoordinate};
use crate::models::settings::GridSettings;
use crate::services::scheduling::{SlotGeometry, TimeGrid};
use crate::ui_egui::{EventLog, GridLayout, InteractionController, MoveCommit};

fn default_column_width() -> f32 {
    120.0
}

/// A grid, its appointments and the input to replay against them
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    /// Overrides the settings file when present
    #[serde(default)]
    pub settings: Option<GridSettings>,
    pub dates: Vec<NaiveDate>,
    pub rooms: Vec<RoomId>,
    pub open: NaiveTime,
    pub close: NaiveTime,
    /// Screen position of the first cell's top-left corner
    #[serde(default)]
    pub origin: [f32; 2],
    #[serde(default = "default_column_width")]
    pub column_width: f32,
    #[serde(default)]
    pub unavailable: Vec<UnavailableCell>,
    #[serde(default)]
    pub appointments: Vec<Appointment>,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnavailableCell {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub room_id: RoomId,
    #[serde(default = "default_unavailable")]
    pub availability: CellAvailability,
}

fn default_unavailable() -> CellAvailability {
    CellAvailability::Inactive
}

/// One input event, in screen coordinates
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Step {
    BeginDrag {
        appointment_id: AppointmentId,
        #[serde(default)]
        grab_offset_px: f32,
    },
    BeginMove {
        appointment_id: AppointmentId,
    },
    PointerMove {
        x: f32,
        y: f32,
    },
    PointerLeave,
    Click {
        x: f32,
        y: f32,
    },
    Drop {
        x: f32,
        y: f32,
    },
    Key {
        key: String,
    },
    Cancel,
}

pub struct Replay {
    controller: InteractionController<EventLog>,
    layout: GridLayout,
    appointments: Vec<Appointment>,
}

impl Replay {
    pub fn new(scenario: &Scenario, settings: GridSettings) -> Result<Self> {
        settings.validate().context("Invalid grid settings")?;
        let geometry = SlotGeometry::from_settings(&settings)?;
        let grid = TimeGrid::for_days(
            scenario.dates.clone(),
            scenario.open,
            scenario.close,
            scenario.rooms.clone(),
            geometry,
        )
        .context("Invalid grid in scenario")?;

        let origin = Pos2::new(scenario.origin[0], scenario.origin[1]);
        let mut layout = GridLayout::from_settings(origin, scenario.column_width, &settings);
        for cell in &scenario.unavailable {
            layout.set_availability(
                CellCoordinate::new(cell.date, cell.time, cell.room_id.clone()),
                cell.availability,
            );
        }

        let controller = InteractionController::new(grid, settings, EventLog::new())?;
        Ok(Self {
            controller,
            layout,
            appointments: scenario.appointments.clone(),
        })
    }

    /// The appointment list with every commit so far applied
    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    pub fn controller(&self) -> &InteractionController<EventLog> {
        &self.controller
    }

    fn appointment(&self, id: &AppointmentId) -> Result<Appointment> {
        self.appointments
            .iter()
            .find(|apt| &apt.id == id)
            .cloned()
            .ok_or_else(|| anyhow!("Unknown appointment {}", id))
    }

    /// Feed one step and return the lines it produced
    pub fn step(&mut self, index: usize, step: &Step) -> Result<Vec<Value>> {
        log::debug!("Replay step {}: {:?}", index, step);
        let source = self.appointments.clone();

        let result = match step {
            Step::BeginDrag {
                appointment_id,
                grab_offset_px,
            } => {
                let appointment = self.appointment(appointment_id)?;
                self.controller.begin_drag(&appointment, *grab_offset_px)
            }
            Step::BeginMove { appointment_id } => {
                let appointment = self.appointment(appointment_id)?;
                self.controller.begin_move(&appointment)
            }
            Step::PointerMove { x, y } => {
                let event = self.layout.pointer_event(self.controller.grid(), Pos2::new(*x, *y));
                self.controller.pointer_moved(&event, &source).map(|_| ())
            }
            Step::PointerLeave => {
                self.controller.pointer_left();
                Ok(())
            }
            Step::Click { x, y } => {
                let event = self.layout.pointer_event(self.controller.grid(), Pos2::new(*x, *y));
                self.controller.click(&event, &source).map(|_| ())
            }
            Step::Drop { x, y } => {
                let event = self.layout.pointer_event(self.controller.grid(), Pos2::new(*x, *y));
                self.controller.drop(&event, &source).map(|_| ())
            }
            Step::Key { key } => {
                let key = egui::Key::from_name(key).ok_or_else(|| anyhow!("Unknown key {:?}", key))?;
                self.controller.handle_key(key);
                Ok(())
            }
            Step::Cancel => {
                self.controller.cancel();
                Ok(())
            }
        };

        let mut lines = Vec::new();
        for event in self.controller.sink_mut().take() {
            if let crate::ui_egui::GridEvent::Committed(commit) = &event {
                self.apply(commit)?;
            }
            lines.push(serde_json::to_value(&event)?);
        }
        if let Err(err) = result {
            log::warn!("Step {} rejected: {}", index, err);
            lines.push(json!({
                "event": "rejected",
                "step": index,
                "reason": err.to_string(),
            }));
        }
        Ok(lines)
    }

    /// Persist a commit the way the appointment store would
    fn apply(&mut self, commit: &MoveCommit) -> Result<()> {
        let Some(appointment) = self
            .appointments
            .iter_mut()
            .find(|apt| apt.id == commit.appointment_id)
        else {
            bail!("Commit for unknown appointment {}", commit.appointment_id);
        };
        appointment.date = commit.new_date;
        appointment.start_time = commit.new_time;
        appointment.room_id = commit.new_room_id.clone();
        Ok(())
    }
}

/// Replay every step of `scenario`, returning all emitted lines in order
pub fn run(scenario: &Scenario, settings: GridSettings) -> Result<Vec<Value>> {
    let mut replay = Replay::new(scenario, settings)?;
    let mut lines = Vec::new();
    for (index, step) in scenario.steps.iter().enumerate() {
        lines.extend(replay.step(index, step)?);
    }
    log::info!(
        "Replayed {} steps, {} events emitted",
        scenario.steps.len(),
        lines.len()
    );
    Ok(lines)
}
