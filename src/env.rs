/// Environment variable names consulted by the layout when populating
/// host/process fields of the output record.
///
/// These are lookups, not configuration: an absent variable becomes an
/// empty field in the record, never an error.

/// Logical application name injected by the platform; feeds `paasApp`.
pub const APP_NAME_ENV: &str = "APP_NAME";

/// Host identifier injected by the platform; feeds `serverId`.
pub const HOSTNAME_ENV: &str = "HOSTNAME";

/// OS user name on unix-like systems; feeds `userId`.
pub const USER_ENV: &str = "USER";

/// OS user name on Windows; fallback for `userId`.
pub const USERNAME_ENV: &str = "USERNAME";

/// Read an environment variable or fall back to a provided default.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
