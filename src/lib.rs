// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

pub mod alphabet;
pub mod app;
pub mod config;
pub mod errors;
pub mod notify;
pub mod poller;
pub mod render;
pub mod result;
mod runner;
pub mod seq;
pub mod ui;
pub mod validate;

use crate::errors::TappError;

pub fn run() -> Result<(), TappError> {
    runner::run()
}
