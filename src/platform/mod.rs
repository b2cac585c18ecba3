//=========================================================================
// Platform Subsystem
//
// Bridges Winit (OS-level events) with the core thread via crossbeam.
//
// Architecture:
// ```text
//  Main Thread:                     Core Thread:
//  ┌──────────────────────────┐    ┌──────────────────────┐
//  │  Winit Event Loop        │    │  Orchestrator        │
//  │   ↓                      │    │   ↓                  │
//  │  NavigationKeys          │    │  SceneSystem         │
//  │   └─ key → command       │    │   ├─ transitions     │
//  │   ↓                      │    │   └─ scene_manager   │
//  │  RedrawRequested         │    │                      │
//  │   └─ measures delta      │    └──────────────────────┘
//  │   ↓                      │             ↑
//  │  Channel ────────────────┼─────────────┘
//  └──────────────────────────┘    PlatformEvent
// ```
//
// Key Design Decisions:
// - **RedrawRequested = frame boundary**: one Frame event per redraw,
//   carrying the wall-clock time since the previous one
// - **Graceful channel disconnect**: if the core thread dies, the
//   platform logs and keeps running so the window can still close
// - **Main thread requirement**: Winit mandates main thread on macOS/iOS,
//   so this runs on the thread that called `App::run()`
//
//=========================================================================

//=== Submodules ==========================================================

mod navigation_keys;

//=== External Crates =====================================================

use std::time::Instant;

use crossbeam_channel::Sender;
use log::*;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowAttributes},
};

//=== Internal Imports ====================================================

use crate::core::config::SceneSystemConfig;
use crate::core::navigation::NavigationCommand;
use navigation_keys::NavigationKeys;

//=== PlatformEvent =======================================================

/// Events sent from the platform layer to the core thread.
///
/// These are the only messages that cross the thread boundary.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PlatformEvent {
    /// One displayed frame. `delta` is seconds since the previous frame,
    /// zero for the first.
    Frame { delta: f32 },

    /// Drawing surface resized, in physical pixels.
    Resized { width: u32, height: u32 },

    /// The user asked to go somewhere.
    Navigate(NavigationCommand),

    /// Window close requested by user or OS.
    ///
    /// Core thread terminates cleanly upon receiving this.
    WindowClosed,
}

//=== PlatformError =======================================================

/// Platform initialization and runtime errors.
///
/// These are fatal: without an event loop there is nothing to drive.
#[derive(Debug)]
pub(crate) enum PlatformError {
    /// Failed to create event loop (rare, indicates OS-level issue).
    EventLoopCreation(winit::error::EventLoopError),

    /// Event loop execution error.
    EventLoopExecution(winit::error::EventLoopError),
}

//--- Trait Implementations -----------------------------------------------

impl std::fmt::Display for PlatformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EventLoopCreation(e) => write!(f, "Event loop creation failed: {}", e),
            Self::EventLoopExecution(e) => write!(f, "Event loop error: {}", e),
        }
    }
}

impl std::error::Error for PlatformError {}

//=== WindowSettings ======================================================

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl From<&SceneSystemConfig> for WindowSettings {
    fn from(config: &SceneSystemConfig) -> Self {
        Self {
            title: config.window_title.clone(),
            width: config.window_width,
            height: config.window_height,
        }
    }
}

//=== Platform ============================================================

/// Window owner and event forwarder.
///
/// Runs on the main thread (Winit requirement on macOS/iOS) and sends
/// [`PlatformEvent`]s to the core thread.
///
/// # Fields
///
/// - `window`: created lazily in `resumed()` (mobile compatibility)
/// - `last_frame`: timestamp of the previous redraw
/// - `navigation_keys`: converts key presses into navigation commands
pub(crate) struct Platform {
    window: Option<Window>,
    settings: WindowSettings,
    last_frame: Option<Instant>,
    event_sender: Sender<PlatformEvent>,
    navigation_keys: NavigationKeys,
}

impl Platform {
    //--- Construction -----------------------------------------------------

    /// Does not create the window yet; that happens in `resumed()`.
    pub fn new(event_sender: Sender<PlatformEvent>, settings: WindowSettings) -> Self {
        info!(target: "platform", "Platform subsystem initialized");
        Self {
            window: None,
            settings,
            last_frame: None,
            event_sender,
            navigation_keys: NavigationKeys::new(),
        }
    }

    //--- Execution --------------------------------------------------------

    /// Runs the event loop until the window closes.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the event loop cannot be created or
    /// fails while running.
    ///
    /// # Panics
    ///
    /// Panics if called off the main thread (macOS/iOS Winit requirement).
    pub fn run(mut self) -> Result<(), PlatformError> {
        debug!(target: "platform", "Starting Winit event loop");

        let event_loop = EventLoop::new().map_err(PlatformError::EventLoopCreation)?;

        event_loop
            .run_app(&mut self)
            .map_err(PlatformError::EventLoopExecution)
    }

    //--- Internal Helpers -------------------------------------------------

    /// Sends an event to the core thread.
    ///
    /// A disconnected channel means the core thread already exited; the
    /// event is dropped so the window can still be closed normally.
    fn send(&self, event: PlatformEvent) {
        if let Err(e) = self.event_sender.send(event) {
            warn!(target: "platform", "Channel disconnected, dropping {:?}", e.into_inner());
        }
    }

    /// Seconds since the previous frame, zero for the first.
    fn frame_delta(&mut self, now: Instant) -> f32 {
        let delta = self
            .last_frame
            .map_or(0.0, |last| now.saturating_duration_since(last).as_secs_f32());
        self.last_frame = Some(now);
        delta
    }

    //--- Test Accessors ---------------------------------------------------

    #[cfg(test)]
    pub(crate) fn window(&self) -> Option<&Window> {
        self.window.as_ref()
    }
}

//=== Winit Integration ===================================================

impl ApplicationHandler for Platform {
    /// Called when app becomes active (startup or mobile resume).
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Window already exists (mobile resume?)");
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title(self.settings.title.clone())
            .with_inner_size(LogicalSize::new(self.settings.width, self.settings.height));

        match event_loop.create_window(attrs) {
            Ok(window) => {
                let size = window.inner_size();
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    size.width,
                    size.height,
                    window.scale_factor()
                );
                self.send(PlatformEvent::Resized {
                    width: size.width,
                    height: size.height,
                });
                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                self.send(PlatformEvent::WindowClosed);
                event_loop.exit();
            }
        }
    }

    /// Handles per-window events.
    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        match &event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                self.send(PlatformEvent::WindowClosed);
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                self.send(PlatformEvent::Resized {
                    width: size.width,
                    height: size.height,
                });
            }

            WindowEvent::ModifiersChanged(state) => {
                trace!(target: "platform::input", "Modifiers changed: {:?}", state);
                self.navigation_keys.update_modifiers(state.state());
            }

            WindowEvent::KeyboardInput { event: key_event, .. } => {
                match self.navigation_keys.process_key_event(key_event) {
                    Some(command) => {
                        debug!(target: "platform::input", "Navigation: {:?}", command);
                        self.send(PlatformEvent::Navigate(command));
                    }
                    None => trace!(target: "platform::input", "Key ignored"),
                }
            }

            WindowEvent::RedrawRequested => {
                let delta = self.frame_delta(Instant::now());
                self.send(PlatformEvent::Frame { delta });

                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => {}
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
