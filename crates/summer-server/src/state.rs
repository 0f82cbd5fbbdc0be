use summer_core::Settings;

/// Shared application state, available to all route handlers via `State<Arc<AppState>>`.
pub struct AppState {
    /// Provider credentials and defaults, read from the environment at startup.
    pub settings: Settings,
}
