//=========================================================================
// Portfolio Scenes: Library Root
//
// Scene lifecycle and transition core for an interactive 3D portfolio,
// plus a native window host to run it in.
//
// Responsibilities:
// - Expose the scene system (`core`) and the portfolio scenes (`scenes`)
// - Keep the winit integration (`platform`) hidden from users
// - Provide the `App` facade that wires everything together
//
// Typical usage:
// ```no_run
// use portfolio_scenes::AppBuilder;
//
// fn main() {
//     AppBuilder::new().build().run().expect("scene system installs");
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds the platform-independent machinery. `scenes` holds one
// scene per portfolio section. Hosts embedding the system without a
// window use these directly.
//
pub mod core;
pub mod prelude;
pub mod scenes;

//--- Internal Modules ----------------------------------------------------
//
// `platform` owns the winit event loop and is not part of the public
// API. `app` is the entry point that joins platform and core.
//
mod app;
mod platform;

//--- Public Exports ------------------------------------------------------

pub use app::{App, AppBuilder, DEFAULT_CHANNEL_CAPACITY};
