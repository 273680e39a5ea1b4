// Clinic Agenda Library
// Scheduling core for the appointment grid: geometry, snapping, conflicts,
// zones and the reschedule interaction state machine

pub mod error;
pub mod models;
pub mod services;
pub mod ui_egui;
pub mod utils;
