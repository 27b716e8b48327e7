/// Hostname of the page, for tenant resolution. Falls back to `localhost`,
/// which resolves to the development tenant.
pub fn hostname() -> String {
    web_sys::window()
        .and_then(|w| w.location().hostname().ok())
        .unwrap_or_else(|| "localhost".to_string())
}
