//=========================================================================
// Portfolio App
//
// Entry point that wires the scene system to a native window.
//
// Architecture:
// ```text
//     AppBuilder  ──build()──>  App  ──run()──>  [Runtime]
//         │                      │
//         ├─ with_config()       ├─ installs the scene system
//         ├─ with_renderer()     ├─ spawns the core thread
//         └─ with_capabilities() └─ runs the platform until close
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::Path;

use crossbeam_channel::{bounded, Receiver, Sender};
use log::{error, info};

//=== Internal Dependencies ===============================================

use crate::core::config::SceneSystemConfig;
use crate::core::error::{ConfigError, TransitionResult};
use crate::core::globals::{install, SystemGuard};
use crate::core::orchestrator::CoreSystemsOrchestrator;
use crate::core::quality::Capabilities;
use crate::core::render::camera::Camera;
use crate::core::render::{HeadlessRenderer, Renderer};
use crate::core::section::Section;
use crate::platform::{Platform, PlatformEvent, WindowSettings};
use crate::scenes;

/// Platform → core queue length when none is configured.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 128;

//=== AppBuilder ==========================================================

/// Builder for configuring and constructing an [`App`].
///
/// # Default Values
///
/// - **Config**: [`SceneSystemConfig::default`]
/// - **Renderer**: [`HeadlessRenderer`]
/// - **Capabilities**: everything available
/// - **Channel capacity**: 128 events
///
/// # Examples
///
/// ```no_run
/// use portfolio_scenes::AppBuilder;
///
/// let app = AppBuilder::new()
///     .with_config_file("portfolio.toml")
///     .expect("readable config")
///     .build();
///
/// app.run().expect("scene system installs");
/// ```
pub struct AppBuilder {
    config: SceneSystemConfig,
    renderer: Option<Box<dyn Renderer>>,
    capabilities: Capabilities,
    channel_capacity: usize,
}

impl AppBuilder {
    pub fn new() -> Self {
        Self {
            config: SceneSystemConfig::default(),
            renderer: None,
            capabilities: Capabilities::ALL,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    pub fn with_config(mut self, config: SceneSystemConfig) -> Self {
        self.config = config;
        self
    }

    /// Loads the config from a TOML file.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read, parsed or validated.
    pub fn with_config_file(self, path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config = SceneSystemConfig::load_from_file(path)?;
        Ok(self.with_config(config))
    }

    /// Rendering backend bound to the window. Defaults to headless.
    pub fn with_renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    /// Host features reported by capability detection. Scenes needing a
    /// missing feature are not registered.
    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Sets the channel capacity for platform → core communication.
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    pub fn build(self) -> App {
        info!(
            "Building app (channel: {}, capabilities: {:?})",
            self.channel_capacity, self.capabilities
        );

        App {
            config: self.config,
            renderer: self
                .renderer
                .unwrap_or_else(|| Box::new(HeadlessRenderer::new())),
            capabilities: self.capabilities,
            channel_capacity: self.channel_capacity,
        }
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== App =================================================================

/// Portfolio runtime: the process-wide scene system plus its window.
///
/// ```text
/// App (Main Thread)
///   ├─► CoreSystemsOrchestrator (Core Thread)
///   │     └─► SceneSystem: transitions + scene_manager
///   │
///   └─► Platform (Event Loop)
///         └─► Window, navigation keys, frame timing
/// ```
pub struct App {
    config: SceneSystemConfig,
    renderer: Box<dyn Renderer>,
    capabilities: Capabilities,
    channel_capacity: usize,
}

impl App {
    /// Installs the scene system with every supported scene and shows
    /// the home section.
    ///
    /// Split from [`App::run`] so hosts without a window can drive frames
    /// through [`crate::core::globals::lock_scene_system`].
    pub fn install(self) -> TransitionResult<SystemGuard> {
        let capabilities = self.capabilities;

        install(&self.config, self.renderer, Camera::default(), |manager| {
            let count = scenes::register_all(manager, capabilities)?;
            info!("{} scenes registered", count);
            manager.set_active_scene(Section::Home)
        })
    }

    //--- Execution --------------------------------------------------------

    /// Starts the app and blocks until the window closes.
    ///
    /// # Lifecycle
    ///
    /// 1. Installs the scene system
    /// 2. Spawns the core thread
    /// 3. Runs the platform event loop (blocks here)
    /// 4. On window close: core thread exits, then everything is disposed
    ///
    /// # Errors
    ///
    /// Fails only if the scene system cannot be installed. Platform and
    /// core-thread failures are logged and end the run.
    pub fn run(self) -> TransitionResult {
        info!("Starting portfolio");
        let settings = WindowSettings::from(&self.config);
        let channel_capacity = self.channel_capacity;

        //--- 1. Install the scene system ---------------------------------
        let guard = self.install()?;

        //--- 2. Create communication channel -----------------------------
        let (tx, rx): (Sender<PlatformEvent>, Receiver<PlatformEvent>) = bounded(channel_capacity);

        //--- 3. Spawn the core thread ------------------------------------
        let core_handle = CoreSystemsOrchestrator::new().spawn_core_thread(rx);
        info!("Core thread spawned");

        //--- 4. Launch the platform subsystem ----------------------------
        let platform = Platform::new(tx, settings);
        if let Err(e) = platform.run() {
            error!("Platform error: {}", e);
        }
        info!("Platform event loop exited");

        //--- 5. Cleanup --------------------------------------------------
        // The sender was moved into the platform and dropped with it, so
        // the core thread sees a disconnect even without WindowClosed.
        match core_handle.join() {
            Ok(()) => info!("Core thread terminated cleanly"),
            Err(e) => error!("Core thread panicked: {:?}", e),
        }

        guard.dispose();
        info!("Portfolio shutdown complete");
        Ok(())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::globals::{lock_scene_system, GLOBAL_TEST_LOCK};
    use std::sync::PoisonError;

    //=====================================================================
    // AppBuilder Tests
    //=====================================================================

    #[test]
    fn builder_defaults() {
        let builder = AppBuilder::new();
        assert_eq!(builder.channel_capacity, DEFAULT_CHANNEL_CAPACITY);
        assert_eq!(builder.capabilities, Capabilities::ALL);
        assert!(builder.renderer.is_none());
    }

    #[test]
    fn builder_with_channel_capacity() {
        let builder = AppBuilder::new().with_channel_capacity(256);
        assert_eq!(builder.channel_capacity, 256);
    }

    #[test]
    #[should_panic(expected = "Channel capacity must be positive")]
    fn builder_with_channel_capacity_panics_on_zero() {
        AppBuilder::new().with_channel_capacity(0);
    }

    #[test]
    fn builder_with_missing_config_file_fails() {
        let result = AppBuilder::new().with_config_file("/nonexistent/portfolio.toml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn builder_fluent_api_chaining() {
        let config = SceneSystemConfig {
            window_title: "Demo".into(),
            ..Default::default()
        };
        let app = AppBuilder::new()
            .with_config(config)
            .with_capabilities(Capabilities::default())
            .with_channel_capacity(16)
            .build();

        assert_eq!(app.config.window_title, "Demo");
        assert_eq!(app.channel_capacity, 16);
    }

    //=====================================================================
    // Installation Tests
    //=====================================================================

    #[test]
    fn install_registers_supported_scenes_and_shows_home() {
        let _serial = GLOBAL_TEST_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        let renderer = HeadlessRenderer::new();

        let guard = AppBuilder::new()
            .with_renderer(renderer.clone())
            .with_capabilities(Capabilities::default())
            .build()
            .install()
            .unwrap();

        {
            let system = lock_scene_system();
            assert_eq!(system.scene_manager.active_section(), Some(Section::Home));
            assert_eq!(system.scene_manager.len(), 4);
        }

        drop(guard);
        assert_eq!(renderer.live_resources(), 0);
    }
}
