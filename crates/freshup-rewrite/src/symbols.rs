//! Fixed names of the Fresh 1.x and Fresh 2 APIs

/// Legacy server entry specifier
pub const LEGACY_SERVER_MODULE: &str = "$fresh/server.ts";
/// Legacy client runtime specifier
pub const LEGACY_RUNTIME_MODULE: &str = "$fresh/runtime.ts";

/// New primary module
pub const PRIMARY_MODULE: &str = "fresh";
/// New client runtime module
pub const RUNTIME_MODULE: &str = "fresh/runtime";
/// Module that keeps legacy names importable
pub const COMPAT_MODULE: &str = "fresh/compat";

/// UI library whose classic JSX pragma imports are dropped
pub const UI_LIBRARY: &str = "preact";
/// Symbols only needed by the classic `@jsx h` pragma
pub const LEGACY_PRAGMA_SYMBOLS: &[&str] = &["h", "Fragment"];

/// Legacy names re-homed to [`COMPAT_MODULE`]
pub const COMPAT_SYMBOLS: &[&str] = &[
    "AppProps",
    "ErrorPageProps",
    "Handler",
    "Handlers",
    "LayoutProps",
    "PageProps",
    "RouteContext",
    "defineApp",
    "defineLayout",
    "defineRoute",
];

/// Per-method handler properties
pub const HTTP_METHODS: &[&str] = &["GET", "POST", "PATCH", "PUT", "DELETE"];

/// Declarative wrappers whose first argument is a route function
pub const ROUTE_WRAPPERS: &[&str] = &["defineApp", "defineLayout", "defineRoute"];

/// Name of the exported handler binding
pub const HANDLER_EXPORT: &str = "handler";

/// Parameter name of the consolidated context argument
pub const CONTEXT_PARAM: &str = "ctx";
/// Conventional name of the request parameter
pub const REQUEST_PARAM: &str = "req";
/// Type of the consolidated context argument
pub const CONTEXT_TYPE: &str = "FreshContext";
/// Legacy context type replaced by [`CONTEXT_TYPE`] on handler parameters
pub const LEGACY_CONTEXT_TYPE: &str = "RouteContext";

/// Context member moved under `ctx.info`
pub const RELOCATED_MEMBER: &str = "remoteAddr";
/// Field that now holds connection info
pub const INFO_MEMBER: &str = "info";
/// Context method replaced by throwing a status
pub const NOT_FOUND_MEMBER: &str = "renderNotFound";
/// Replacement for [`NOT_FOUND_MEMBER`]
pub const THROW_MEMBER: &str = "throw";
/// Status appended to the replacement call
pub const NOT_FOUND_STATUS: &str = "404";

/// Name of the routing directory
pub const ROUTES_DIR: &str = "routes";
/// Prefix of private route group directories
pub const PRIVATE_GROUP_PREFIX: &str = "(_";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compat_list_has_ten_names() {
        assert_eq!(COMPAT_SYMBOLS.len(), 10);
    }

    #[test]
    fn wrappers_are_compat_symbols() {
        for wrapper in ROUTE_WRAPPERS {
            assert!(COMPAT_SYMBOLS.contains(wrapper));
        }
    }
}
