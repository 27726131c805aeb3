//! Desktop simulator for touchmap.
//!
//! Replays a synthetic finger path through `touchmap-core` so calibration and
//! touch object matching can be exercised without a touch panel. Settings are
//! kept in a directory of per-task files; a demo layout is written on first
//! run. Halfway through, a second thread reloads the settings while the main
//! thread keeps polling.
//!
//! # Usage
//!
//! ```text
//! touchmap-simulator [SETTINGS_DIR] [TICKS]
//! ```
//!
//! | Argument       | Default             |
//! |----------------|---------------------|
//! | `SETTINGS_DIR` | `./touchmap-data`   |
//! | `TICKS`        | `60` polls (100 ms) |
//!
//! Set `RUST_LOG=debug` (or `trace` for per-object matching) for more detail.

mod store;

use std::fs;
use std::io::ErrorKind;
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use log::{error, info, warn};
use touchmap_core::config::CONFIG_ENCODED_MAX;
use touchmap_core::{
    CalibrationState, Point, RawTouch, SharedTouchPlugin, TaskIndex, TouchConfig,
    TouchController, TouchEvent, TouchObject, TouchObjects, TouchPlugin, TouchSettings,
};

use store::FileStore;

// ---------------------------------------------------------------------------
// Simulation constants
// ---------------------------------------------------------------------------

/// Task the simulated plugin runs as.
const TASK: TaskIndex = 0;

/// Poll interval (the firmware polls ten times per second).
const POLL_INTERVAL: Duration = Duration::from_millis(100);

const DEFAULT_SETTINGS_DIR: &str = "touchmap-data";
const DEFAULT_TICKS: u32 = 60;
const CONFIG_FILE: &str = "config.bin";

/// Finger is down for this many ticks out of every `TAP_PERIOD`.
const TAP_DOWN_TICKS: u32 = 6;
const TAP_PERIOD: u32 = 8;

// ---------------------------------------------------------------------------
// Scripted controller
// ---------------------------------------------------------------------------

/// Controller that draws a slow Lissajous path over the raw range and lifts
/// the finger periodically. Pressure varies so some samples fall under the
/// threshold.
struct ScriptedController {
    tick: u32,
    rotation: u8,
}

impl ScriptedController {
    fn new() -> Self {
        Self {
            tick: 0,
            rotation: 0,
        }
    }
}

impl TouchController for ScriptedController {
    fn begin(&mut self) {
        info!("Scripted controller started (rotation {})", self.rotation);
    }

    /// Called once per poll, so it also drives the clock.
    fn touched(&mut self) -> bool {
        self.tick = self.tick.wrapping_add(1);
        self.tick % TAP_PERIOD < TAP_DOWN_TICKS
    }

    fn read_raw(&mut self) -> RawTouch {
        let t = f64::from(self.tick);

        // Raw range of a typical resistive panel is roughly 150..3900
        let x = 2000.0 + 1850.0 * (t / 7.0).sin();
        let y = 2000.0 + 1850.0 * (t / 11.0).cos();
        let z = 60.0 + 55.0 * (t / 3.0).sin();

        RawTouch::new(x as u16, y as u16, z as u8)
    }

    fn set_rotation(&mut self, rotation: u8) {
        self.rotation = rotation;
    }
}

// ---------------------------------------------------------------------------
// Demo configuration
// ---------------------------------------------------------------------------

/// Layout written on first run: a background panel, a header, a slider and
/// two buttons, plus one hidden debug hotspot.
fn demo_settings() -> TouchSettings {
    let defs: [(&str, (u16, u16), (u16, u16)); 6] = [
        ("background", (0, 0), (239, 319)),
        ("header", (0, 0), (239, 40)),
        ("slider", (20, 120), (220, 160)),
        ("btn_ok", (20, 260), (110, 300)),
        ("btn_cancel", (130, 260), (220, 300)),
        ("_debug", (0, 0), (20, 20)),
    ];

    let mut objects = TouchObjects::new();
    for (name, top_left, bottom_right) in defs {
        if objects
            .push(TouchObject::new(name, top_left.into(), bottom_right.into()))
            .is_err()
        {
            warn!("Touch object list full, dropping {}", name);
        }
    }

    TouchSettings {
        calibration: CalibrationState::new(Point::new(150, 150), Point::new(3850, 3850), false),
        objects,
    }
}

fn demo_config() -> TouchConfig {
    TouchConfig {
        send_z: true,
        use_calibration: true,
        object_count: 6,
        ..TouchConfig::default()
    }
}

/// Read the postcard-encoded config, writing the demo config when missing.
fn load_or_seed_config(store: &FileStore) -> TouchConfig {
    let path = store.path(CONFIG_FILE);

    match fs::read(&path) {
        Ok(bytes) => match TouchConfig::decode(&bytes) {
            Ok(config) => return config,
            Err(e) => warn!("Ignoring {}: {}", path.display(), e),
        },
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => warn!("Cannot read {}: {}", path.display(), e),
    }

    let config = demo_config();
    let mut buf = [0u8; CONFIG_ENCODED_MAX];
    match config.encode(&mut buf) {
        Ok(bytes) => {
            if let Err(e) = fs::write(&path, bytes) {
                warn!("Cannot write {}: {}", path.display(), e);
            }
        }
        Err(e) => warn!("{}", e),
    }
    config
}

/// Write the demo layout when the task has no touch objects yet.
fn seed_settings(store: &mut FileStore) {
    match TouchSettings::load(store, TASK) {
        Ok(settings) if !settings.objects.is_empty() => {}
        Ok(_) => {
            info!("No touch objects stored for task {}, writing demo layout", TASK);
            if let Err(e) = demo_settings().save(store, TASK) {
                warn!("{}", e);
            }
        }
        Err(e) => warn!("{}", e),
    }
}

/// Log the calibration and every touch object of the loaded layout.
fn log_layout(plugin: &TouchPlugin<ScriptedController>) {
    info!(
        "Calibration {}: {:?} - {:?}",
        if plugin.is_calibration_active() { "active" } else { "inactive" },
        plugin.calibration().top_left,
        plugin.calibration().bottom_right
    );
    for (index, object) in plugin.objects().iter().enumerate() {
        info!(
            "Object #{} {:<14} ({},{})-({},{}) area {}{}",
            index,
            object.name(),
            object.top_left().x,
            object.top_left().y,
            object.bottom_right().x,
            object.bottom_right().y,
            object.area(),
            if object.is_valid() { "" } else { " [ignored]" }
        );
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let settings_dir = args.next().unwrap_or_else(|| DEFAULT_SETTINGS_DIR.into());
    let ticks = match args.next().map(|arg| arg.parse::<u32>()) {
        None => DEFAULT_TICKS,
        Some(Ok(ticks)) => ticks,
        Some(Err(e)) => {
            error!("Invalid tick count: {}", e);
            return ExitCode::FAILURE;
        }
    };

    info!("Starting touchmap simulator");
    info!("Settings: {}  Ticks: {}", settings_dir, ticks);

    let mut store = match FileStore::new(&settings_dir) {
        Ok(store) => store,
        Err(e) => {
            error!("Cannot open settings directory {}: {}", settings_dir, e);
            return ExitCode::FAILURE;
        }
    };

    let config = load_or_seed_config(&store);
    seed_settings(&mut store);

    let touch = SharedTouchPlugin::new(TouchPlugin::new());
    if let Err(e) = touch.init(TASK, ScriptedController::new(), config, &mut store) {
        // Keeps running with empty settings, like the firmware
        warn!("{}", e);
    }
    touch.lock(|plugin| log_layout(plugin));

    // -----------------------------------------------------------------------
    // Poll loop, with a settings reload from a second thread halfway through
    // -----------------------------------------------------------------------
    let result = thread::scope(|scope| {
        scope.spawn(|| {
            thread::sleep(POLL_INTERVAL * (ticks / 2));
            match touch.load_settings(TASK, &mut store) {
                Ok(()) => info!("Touch settings reloaded"),
                Err(e) => warn!("{}", e),
            }
        });

        for _ in 0..ticks {
            match touch.poll() {
                Ok(Some(report)) => {
                    let events = touch.lock(|plugin| report.events(plugin.config()));
                    for event in events {
                        match event {
                            TouchEvent::Coordinates(p) => info!("xy = {},{}", p.x, p.y),
                            TouchEvent::Pressure(z) => info!("z = {}", z),
                            TouchEvent::Object(name) => info!("touched {}", name),
                        }
                    }
                }
                Ok(None) => {}
                Err(e) => return Err(e),
            }

            thread::sleep(POLL_INTERVAL);
        }
        Ok(())
    });

    if let Err(e) = result {
        error!("Poll failed: {}", e);
        return ExitCode::FAILURE;
    }

    info!("Simulator exiting");
    ExitCode::SUCCESS
}
