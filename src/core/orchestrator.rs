//=========================================================================
// Core Systems Orchestrator
//
// Drives the process-wide scene system from the logic (non-platform)
// thread.
//
// Responsibilities:
// - Receive platform events over the crossbeam channel
// - Turn navigation commands into transitions
// - Run one scene-system frame per platform frame
// - Exit when the window closes or the platform side hangs up
//
// Notes:
// The orchestrator never touches winit. Frames arrive as deltas measured
// on the platform thread, so animation speed follows the display rate.
// Every event batch is applied under a single lock of the scene system.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::thread;

//=== External Crates =====================================================

use crossbeam_channel::Receiver;
use log::{debug, info, warn};

//=== Internal Modules ====================================================

use crate::core::globals::{lock_scene_system, SceneSystem};
use crate::core::navigation::NavigationCommand;
use crate::core::section::Section;
use crate::platform::PlatformEvent;

//=== TickControl =========================================================

/// Whether the core loop keeps running after a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TickControl {
    Continue,
    Exit,
}

//=== CoreSystemsOrchestrator =============================================

pub(crate) struct CoreSystemsOrchestrator {
    batch: Vec<PlatformEvent>,
}

impl CoreSystemsOrchestrator {
    //--- Construction -----------------------------------------------------

    pub fn new() -> Self {
        Self {
            batch: Vec::with_capacity(8),
        }
    }

    //--- spawn_core_thread() ---------------------------------------------
    //
    // Each iteration:
    //  1. Blocks for the next platform event, then drains the queue
    //  2. Applies the batch to the scene system under one lock
    //  3. Exits on WindowClosed or a disconnected channel
    //
    pub fn spawn_core_thread(self, receiver: Receiver<PlatformEvent>) -> thread::JoinHandle<()> {
        thread::spawn(move || {
            let mut batch = self.batch;

            loop {
                let control = Self::collect_platform_events(&receiver, &mut batch);

                let mut system = lock_scene_system();
                let applied = Self::apply_batch(&mut system, batch.drain(..));
                drop(system);

                if control == TickControl::Exit || applied == TickControl::Exit {
                    info!("Core thread exiting.");
                    break;
                }
            }
        })
    }

    //--- collect_platform_events() ---------------------------------------
    //
    // Waits for at least one event, then takes whatever else is queued.
    //
    fn collect_platform_events(
        receiver: &Receiver<PlatformEvent>,
        batch: &mut Vec<PlatformEvent>,
    ) -> TickControl {
        batch.clear();

        match receiver.recv() {
            Ok(event) => batch.push(event),
            Err(_) => return TickControl::Exit,
        }
        batch.extend(receiver.try_iter());

        TickControl::Continue
    }

    //--- apply_batch() ---------------------------------------------------

    /// Applies events in order. Stops at `WindowClosed`.
    pub(crate) fn apply_batch(
        system: &mut SceneSystem<Section>,
        events: impl IntoIterator<Item = PlatformEvent>,
    ) -> TickControl {
        for event in events {
            match event {
                PlatformEvent::Frame { delta } => {
                    system.frame(delta);
                }
                PlatformEvent::Resized { width, height } => system.resize(width, height),
                PlatformEvent::Navigate(command) => Self::navigate(system, command),
                PlatformEvent::WindowClosed => return TickControl::Exit,
            }
        }
        TickControl::Continue
    }

    fn navigate(system: &mut SceneSystem<Section>, command: NavigationCommand) {
        if command == NavigationCommand::Cancel {
            if system.cancel_transition() {
                debug!("Transition cancelled by user");
            }
            return;
        }

        let Some(target) = Self::registered_target(system, command) else {
            return;
        };
        let options = system.default_options().interrupting();
        if let Err(e) = system.transition_with(target, options) {
            warn!("Navigation to {} rejected: {}", target, e);
        }
    }

    /// Resolves `command`, stepping over sections without a registered
    /// scene for relative moves.
    fn registered_target(system: &SceneSystem<Section>, command: NavigationCommand) -> Option<Section> {
        let current = system.current_target();
        let mut target = command.resolve(current)?;
        if matches!(command, NavigationCommand::Goto(_)) {
            return Some(target);
        }

        for _ in 0..Section::ALL.len() {
            if system.scene_manager.contains(target) {
                return Some(target);
            }
            target = command.resolve(Some(target))?;
        }
        None
    }
}

//=========================================================================
// Tests
//=========================================================================
