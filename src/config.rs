//! Shell configuration.
//!
//! Centralizes all configuration constants used throughout the crate:
//! the home directory, default permissions, the seeded file tree, and
//! the environment defaults.

// =============================================================================
// Filesystem Configuration
// =============================================================================

/// Absolute path of the home directory (the `~` expansion target).
pub const HOME_PATH: &str = "/home/user";

/// Permission string stamped on newly created files (cosmetic, never enforced).
pub const FILE_PERMISSIONS: &str = "rw-r--r--";

/// Permission string stamped on newly created directories.
pub const DIR_PERMISSIONS: &str = "rwxr-xr-x";

/// Directories present in the default seeded tree.
///
/// Intermediate directories are created as needed, so `/home` does not
/// have to be listed before `/home/user`.
pub const SEED_DIRECTORIES: &[&str] = &["/bin", "/etc", HOME_PATH, "/home/user/docs", "/tmp"];

/// Files present in the default seeded tree, as `(path, content)` pairs.
pub const SEED_FILES: &[(&str, &str)] = &[
    ("/etc/motd", "Welcome to sandsh.\n"),
    (
        "/home/user/readme.txt",
        "This tree lives entirely in memory.\nNothing here touches a real disk.\n",
    ),
    ("/home/user/docs/notes.txt", "- resolver\n- tokenizer\n- dispatcher\n"),
];

// =============================================================================
// Script Interpreter Configuration
// =============================================================================

/// Shell names accepted in a shebang line.
///
/// A script whose `#!` line mentions none of these is rejected outright,
/// the same way a host refuses a foreign binary format.
pub const RECOGNIZED_SHELLS: &[&str] = &["sh", "bash", "sandsh"];

// =============================================================================
// Environment Configuration
// =============================================================================

/// Variables seeded into a fresh [`Environment`](crate::core::Environment).
pub const DEFAULT_ENV_VARS: &[(&str, &str)] = &[
    ("HOME", HOME_PATH),
    ("USER", "user"),
    ("SHELL", "/bin/sandsh"),
    ("PATH", "/bin"),
];
