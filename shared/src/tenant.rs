//! Tenant resolution.
//!
//! Every request carries the tenant slug in `X-Tenant-Id`. In production the
//! slug is the first label of the hostname (`acme.app.example.com` → `acme`);
//! on a local development host there is no subdomain, so a value stored in
//! local storage wins and `demo` is the fallback.

use crate::DEFAULT_TENANT;

const LOCAL_HOSTS: [&str; 2] = ["localhost", "127.0.0.1"];

/// Whether `hostname` is a local development host.
pub fn is_local_host(hostname: &str) -> bool {
    LOCAL_HOSTS.contains(&hostname)
}

/// Resolves the tenant slug for `hostname`.
///
/// `local_override` is only consulted on local hosts. An empty override is
/// treated as absent.
pub fn resolve_tenant(hostname: &str, local_override: Option<&str>) -> String {
    if is_local_host(hostname) {
        return local_override
            .filter(|value| !value.is_empty())
            .unwrap_or(DEFAULT_TENANT)
            .to_string();
    }

    hostname.split('.').next().unwrap_or(hostname).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn localhost_without_override_falls_back_to_demo() {
        assert_eq!(resolve_tenant("localhost", None), "demo");
        assert_eq!(resolve_tenant("127.0.0.1", None), "demo");
    }

    #[test]
    fn localhost_uses_stored_override() {
        assert_eq!(resolve_tenant("localhost", Some("acme")), "acme");
        assert_eq!(resolve_tenant("127.0.0.1", Some("globex")), "globex");
    }

    #[test]
    fn empty_override_is_ignored() {
        assert_eq!(resolve_tenant("localhost", Some("")), "demo");
    }

    #[test]
    fn remote_host_uses_first_label() {
        assert_eq!(resolve_tenant("acme.app.example.com", None), "acme");
        // The override never applies outside local hosts.
        assert_eq!(resolve_tenant("acme.app.example.com", Some("other")), "acme");
    }

    #[test]
    fn single_label_host_is_returned_whole() {
        assert_eq!(resolve_tenant("intranet", None), "intranet");
    }
}
