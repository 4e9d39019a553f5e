use crate::event::EventSink;
use crate::permissions::{PermissionNegotiator, PermissionState};
use crate::platform::{PermissionOracle, SensorProvider};
use crate::sampler::ActivitySampler;
use log::info;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

pub struct AgentConfig {
    pub permission_poll_interval: Duration,
    pub sample_interval: Duration,
    /// Idle bucket width in seconds. Wider buckets mean fewer idle-driven
    /// events; focus-switch responsiveness is unaffected.
    pub idle_bucket_secs: f64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            permission_poll_interval: Duration::from_secs(1),
            sample_interval: Duration::from_millis(250),
            idle_bucket_secs: 2.0,
        }
    }
}

/// Runs the two-phase loop on a dedicated thread: permission negotiation
/// until Ready, then sampling until stopped. The phases share the thread,
/// so a negotiator tick and a sampler poll can never overlap.
pub struct SensorAgent {
    config: AgentConfig,
    running: Arc<AtomicBool>,
}

impl SensorAgent {
    pub fn new(config: AgentConfig) -> Self {
        Self {
            config,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn start<O, S, K>(&self, oracle: O, sensor: S, sink: K) -> thread::JoinHandle<()>
    where
        O: PermissionOracle + 'static,
        S: SensorProvider + 'static,
        K: EventSink + Send + 'static,
    {
        self.running.store(true, Ordering::SeqCst);

        let running = Arc::clone(&self.running);
        let permission_poll = self.config.permission_poll_interval;
        let sample_interval = self.config.sample_interval;
        let bucket_secs = self.config.idle_bucket_secs;
        let mut sink = sink;

        thread::spawn(move || {
            let mut negotiator = PermissionNegotiator::new();
            negotiator.start(&oracle);

            while running.load(Ordering::SeqCst) {
                if negotiator.tick(&oracle, &sensor) == PermissionState::Ready {
                    break;
                }
                thread::sleep(permission_poll);
            }

            // The permission poll ends here; the negotiator is released
            // before sampling begins and never drives another OS request.
            drop(negotiator);

            if !running.load(Ordering::SeqCst) {
                return;
            }
            info!("permissions negotiated, sampler starting");

            let mut sampler = ActivitySampler::new(bucket_secs);
            while running.load(Ordering::SeqCst) {
                sampler.sample(&sensor, &mut sink);
                thread::sleep(sample_interval);
            }
        })
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SensorError;
    use crate::event::ActivityEvent;
    use crate::platform::ActiveWindow;
    use std::sync::Mutex;

    struct SharedOracle {
        window_granted: Arc<AtomicBool>,
    }

    impl PermissionOracle for SharedOracle {
        fn has_window_access(&self) -> bool {
            self.window_granted.load(Ordering::SeqCst)
        }

        fn request_window_access(&self) {}

        fn request_content_access(&self) {}
    }

    struct SharedSensor {
        title: Arc<Mutex<String>>,
    }

    impl SensorProvider for SharedSensor {
        fn current_window(&self) -> Option<ActiveWindow> {
            Some(ActiveWindow {
                app_name: "TextEdit".to_string(),
                window_title: self.title.lock().unwrap().clone(),
            })
        }

        fn idle_seconds(&self) -> f64 {
            0.0
        }
    }

    struct SharedSink {
        events: Arc<Mutex<Vec<ActivityEvent>>>,
    }

    impl EventSink for SharedSink {
        fn emit(&mut self, event: &ActivityEvent) -> Result<(), SensorError> {
            self.events.lock().unwrap().push(event.clone());
            Ok(())
        }
    }

    fn fast_config() -> AgentConfig {
        AgentConfig {
            permission_poll_interval: Duration::from_millis(5),
            sample_interval: Duration::from_millis(5),
            idle_bucket_secs: 2.0,
        }
    }

    #[test]
    fn test_agent_starts_and_stops() {
        let agent = SensorAgent::new(fast_config());
        assert!(!agent.is_running());

        let handle = agent.start(
            SharedOracle {
                window_granted: Arc::new(AtomicBool::new(true)),
            },
            SharedSensor {
                title: Arc::new(Mutex::new("notes.txt".to_string())),
            },
            SharedSink {
                events: Arc::new(Mutex::new(Vec::new())),
            },
        );
        assert!(agent.is_running());

        thread::sleep(Duration::from_millis(100));

        agent.stop();
        handle.join().unwrap();
        assert!(!agent.is_running());
    }

    #[test]
    fn test_no_events_before_permissions_resolve() {
        let window_granted = Arc::new(AtomicBool::new(false));
        let title = Arc::new(Mutex::new(String::new()));
        let events = Arc::new(Mutex::new(Vec::new()));

        let agent = SensorAgent::new(fast_config());
        let handle = agent.start(
            SharedOracle {
                window_granted: Arc::clone(&window_granted),
            },
            SharedSensor {
                title: Arc::clone(&title),
            },
            SharedSink {
                events: Arc::clone(&events),
            },
        );

        // Still negotiating: window access has not been granted.
        thread::sleep(Duration::from_millis(50));
        assert!(events.lock().unwrap().is_empty());

        // Window access granted, but the title probe still reads empty.
        window_granted.store(true, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(50));
        assert!(events.lock().unwrap().is_empty());

        // Title resolves: negotiation completes and sampling begins.
        *title.lock().unwrap() = "notes.txt".to_string();
        thread::sleep(Duration::from_millis(100));
        assert!(!events.lock().unwrap().is_empty());
        assert_eq!(events.lock().unwrap()[0].title, "notes.txt");

        agent.stop();
        handle.join().unwrap();
    }

    #[test]
    fn test_stop_during_negotiation_skips_sampling() {
        let events = Arc::new(Mutex::new(Vec::new()));

        let agent = SensorAgent::new(fast_config());
        let handle = agent.start(
            SharedOracle {
                window_granted: Arc::new(AtomicBool::new(false)),
            },
            SharedSensor {
                title: Arc::new(Mutex::new("notes.txt".to_string())),
            },
            SharedSink {
                events: Arc::clone(&events),
            },
        );

        thread::sleep(Duration::from_millis(30));
        agent.stop();
        handle.join().unwrap();

        assert!(events.lock().unwrap().is_empty());
    }
}
