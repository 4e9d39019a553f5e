#[derive(Debug, Clone, Default)]
pub struct ActiveWindow {
    pub app_name: String,
    pub window_title: String,
}

/// Read-only view of the desktop: frontmost window and input idle time.
/// Pure query; implementations hold no sampling state.
pub trait SensorProvider: Send {
    /// Returns None when no focusable application is frontmost.
    fn current_window(&self) -> Option<ActiveWindow>;

    /// Seconds since the last user input event observed system-wide.
    fn idle_seconds(&self) -> f64;
}

/// The OS permission surface. Both request calls are fire-and-forget; the
/// grant lands asynchronously and callers observe it by polling.
pub trait PermissionOracle: Send {
    fn has_window_access(&self) -> bool;
    fn request_window_access(&self);
    fn request_content_access(&self);
}
