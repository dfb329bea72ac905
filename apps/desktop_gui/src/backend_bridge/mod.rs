//! Backend bridge: command vocabulary and the worker thread that owns the controller.

pub mod commands;
pub mod runtime;
