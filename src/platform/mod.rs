pub mod types;

pub use types::{ActiveWindow, PermissionOracle, SensorProvider};

#[cfg(target_os = "macos")]
pub mod macos;

#[cfg(target_os = "linux")]
pub mod linux;

#[cfg(target_os = "macos")]
pub use macos::{MacPermissions as NativePermissions, MacSensor as NativeSensor};

#[cfg(target_os = "linux")]
pub use linux::{LinuxPermissions as NativePermissions, LinuxSensor as NativeSensor};

// Stub for development on other platforms
#[cfg(not(any(target_os = "macos", target_os = "linux")))]
pub struct NativeSensor;

#[cfg(not(any(target_os = "macos", target_os = "linux")))]
impl SensorProvider for NativeSensor {
    fn current_window(&self) -> Option<ActiveWindow> {
        Some(ActiveWindow {
            app_name: "TestApp".to_string(),
            window_title: "Test Window".to_string(),
        })
    }

    fn idle_seconds(&self) -> f64 {
        0.0
    }
}

#[cfg(not(any(target_os = "macos", target_os = "linux")))]
impl NativeSensor {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(not(any(target_os = "macos", target_os = "linux")))]
pub struct NativePermissions;

#[cfg(not(any(target_os = "macos", target_os = "linux")))]
impl PermissionOracle for NativePermissions {
    fn has_window_access(&self) -> bool {
        true
    }

    fn request_window_access(&self) {}

    fn request_content_access(&self) {}
}

#[cfg(not(any(target_os = "macos", target_os = "linux")))]
impl NativePermissions {
    pub fn new() -> Self {
        Self
    }
}
