// Copyright (C) 2024 Laixer Equipment B.V.
// All rights reserved.
//
// This software may be modified and distributed under the terms
// of the included license.  See the LICENSE file for details.

/// The `armviz` library provides the runtime for the planar arm viewer.
///
/// The runtime owns a single playback session. User input arrives as events
/// on a queue and is processed one event at a time. The `playback` module
/// decides which pose is authoritative, the `planner` module talks to the
/// external trajectory service and the `render` module turns the
/// authoritative pose into a scene, read-outs and chart series.
pub mod planner;
pub mod playback;
pub mod render;
pub mod runtime;
pub mod trace;

mod config;

pub use self::config::*;

pub use armviz_core as core;

pub use self::runtime::Error;
pub use self::runtime::Runtime;

/// Armviz runtime module containing various constants.
pub mod consts {
    use std::time::Duration;

    /// Armviz runtime version.
    ///
    /// # Example
    ///
    /// ```
    /// use armviz::consts::VERSION;
    ///
    /// println!("Armviz runtime version: {}", VERSION);
    /// ```
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");

    /// Default location of the configuration file.
    pub const DEFAULT_CONFIG_PATH: &str = "/etc/armviz.conf";

    /// Default address of the trajectory planning service.
    pub const DEFAULT_PLANNER_URL: &str = "http://localhost:8000";

    /// Planning service endpoint, relative to the service address.
    pub const PLANNER_ENDPOINT: &str = "api/generate_trajectory";

    /// Default planning request timeout.
    pub const DEFAULT_PLANNER_TIMEOUT: Duration = Duration::from_secs(5);

    /// Default animation tick period.
    ///
    /// Playback advances one frame per tick, regardless of the sampling
    /// step of the trajectory.
    pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(50);

    /// Default planned motion duration in seconds.
    pub const DEFAULT_DURATION: f32 = 2.5;

    /// Default planned motion sampling step in seconds.
    pub const DEFAULT_DT: f32 = 0.05;

    /// Motion duration bounds accepted from the input controls, in seconds.
    pub const DURATION_RANGE: std::ops::RangeInclusive<f32> = 0.5..=10.0;

    /// Queue size for user and timer events.
    ///
    /// # Example
    ///
    /// ```
    /// use armviz::consts::QUEUE_SIZE_EVENT;
    ///
    /// assert!(QUEUE_SIZE_EVENT > 0);
    /// ```
    pub const QUEUE_SIZE_EVENT: usize = 32;

    /// File name of the rendered frame in the output directory.
    pub const FRAME_FILE_NAME: &str = "frame.svg";

    /// File name of the trajectory trace in the output directory.
    pub const TRACE_FILE_NAME: &str = "trajectory_trace.csv";
}
