//! Window commands. They only enqueue work for the controller, so they never
//! touch a window from the IPC thread.

use tauri::{command, State};

use crate::controller::ControllerHandle;

#[command]
pub fn show_overlay(controller: State<'_, ControllerHandle>) {
    controller.show_overlay();
}

#[command]
pub fn hide_overlay(controller: State<'_, ControllerHandle>) {
    controller.hide_overlay();
}

#[command]
pub fn show_settings(controller: State<'_, ControllerHandle>) {
    controller.show_settings();
}

#[command]
pub fn hide_settings(controller: State<'_, ControllerHandle>) {
    controller.hide_settings();
}
