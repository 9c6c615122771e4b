//! Shared Application State
//!
//! This module defines the `AppState` struct, which holds the command
//! orchestrator shared by all handlers.

use herald_core::CommandOrchestrator;
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<CommandOrchestrator>,
}
