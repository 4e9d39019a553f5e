use crate::event::{ActivityEvent, EventSink};
use crate::platform::SensorProvider;
use log::warn;
use std::time::{SystemTime, UNIX_EPOCH};

/// Fallback application name when no focusable app is frontmost.
pub const UNKNOWN_APP: &str = "Unknown";

/// Last confirmed reading. The sentinel bucket of -1 can never match a real
/// reading, so the first sample after startup always emits.
#[derive(Debug)]
struct SampledState {
    last_app: String,
    last_title: String,
    last_idle_bucket: i64,
}

impl Default for SampledState {
    fn default() -> Self {
        Self {
            last_app: String::new(),
            last_title: String::new(),
            last_idle_bucket: -1,
        }
    }
}

/// Change-triggered sampler: polls the sensor and emits an event only when
/// the `(app, title, idle bucket)` triple differs from the last confirmed
/// reading. Bucketing idle time (default 2 s granularity) suppresses the
/// near-continuous idle-timer noise; focus switches still surface at full
/// poll cadence.
pub struct ActivitySampler {
    state: SampledState,
    bucket_secs: f64,
}

impl ActivitySampler {
    pub fn new(bucket_secs: f64) -> Self {
        Self {
            state: SampledState::default(),
            bucket_secs,
        }
    }

    /// One poll. Reads the sensor, compares against the last confirmed
    /// reading, and on change hands a fresh event to the sink. A sink
    /// failure drops the event and is logged; the sampler never halts.
    pub fn sample<S, K>(&mut self, sensor: &S, sink: &mut K)
    where
        S: SensorProvider + ?Sized,
        K: EventSink + ?Sized,
    {
        let (app, title) = match sensor.current_window() {
            Some(window) => (window.app_name, window.window_title),
            None => (UNKNOWN_APP.to_string(), String::new()),
        };
        let idle = sensor.idle_seconds();
        let bucket = (idle / self.bucket_secs).floor() as i64;

        if app == self.state.last_app
            && title == self.state.last_title
            && bucket == self.state.last_idle_bucket
        {
            return;
        }

        self.state.last_app = app.clone();
        self.state.last_title = title.clone();
        self.state.last_idle_bucket = bucket;

        let event = ActivityEvent {
            timestamp: unix_now(),
            app,
            title,
            idle_seconds: idle,
        };
        if let Err(e) = sink.emit(&event) {
            warn!("dropping activity event: {}", e);
        }
    }
}

fn unix_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}
