//! Pure path resolution.
//!
//! Maps user-typed path strings to absolute canonical paths against a
//! current directory and a home directory. No I/O, never fails: validity
//! against the tree is always the caller's problem.

/// Resolve `input` to an absolute path.
///
/// `current_absolute` must already be slash-rooted (expand a `~`-form
/// current directory with [`to_absolute_display_path`] first).
///
/// Rules, in priority order:
/// 1. `~` becomes `home`.
/// 2. `~/rest` becomes `home/rest`.
/// 3. Already-absolute input is returned unchanged.
/// 4. `.` is the current directory.
/// 5. `..` drops the last segment of the current directory (root stays root).
/// 6. `../`-prefixed input is walked segment by segment against the current
///    directory's segments.
/// 7. Anything else is joined onto the current directory.
pub fn resolve(input: &str, current_absolute: &str, home: &str) -> String {
    if input == "~" {
        return home.to_string();
    }
    if let Some(rest) = input.strip_prefix('~')
        && rest.starts_with('/')
    {
        return format!("{}{}", home, rest);
    }
    if input.starts_with('/') {
        return input.to_string();
    }
    if input == "." {
        return current_absolute.to_string();
    }
    if input == ".." {
        return parent_path(current_absolute);
    }
    if input.starts_with("../") {
        let mut segments: Vec<&str> = current_absolute
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();
        for part in input.split('/').filter(|s| !s.is_empty()) {
            match part {
                ".." => {
                    segments.pop();
                }
                "." => {}
                _ => segments.push(part),
            }
        }
        return join_root(&segments);
    }

    // Plain relative name: joined onto the current directory.
    if current_absolute.ends_with('/') {
        format!("{}{}", current_absolute, input)
    } else {
        format!("{}/{}", current_absolute, input)
    }
}

/// Absolute path of the parent directory; the root is its own parent.
pub fn parent_path(absolute: &str) -> String {
    let segments: Vec<&str> = absolute.split('/').filter(|s| !s.is_empty()).collect();
    if segments.len() <= 1 {
        return "/".to_string();
    }
    join_root(&segments[..segments.len() - 1])
}

/// Expand `~` forms to absolute paths without consulting a current
/// directory. Anything else passes through unchanged. Used to report PWD.
pub fn to_absolute_display_path(path: &str, home: &str) -> String {
    if path == "~" {
        return home.to_string();
    }
    if let Some(rest) = path.strip_prefix('~')
        && rest.starts_with('/')
    {
        return format!("{}{}", home, rest);
    }
    path.to_string()
}

/// Collapse an absolute path back into `~`-relative display form when it is
/// equal to or nested under `home`.
pub fn to_display_path(absolute: &str, home: &str) -> String {
    if absolute == home {
        return "~".to_string();
    }
    match absolute.strip_prefix(home) {
        Some(rest) if rest.starts_with('/') => format!("~{}", rest),
        _ => absolute.to_string(),
    }
}

fn join_root(segments: &[&str]) -> String {
    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", segments.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOME: &str = "/home/user";

    #[test]
    fn test_home_expansion() {
        assert_eq!(resolve("~", "/tmp", HOME), HOME);
        assert_eq!(resolve("~/docs", "/tmp", HOME), "/home/user/docs");
        assert_eq!(resolve("~/a/b", "/", HOME), "/home/user/a/b");
    }

    #[test]
    fn test_absolute_passthrough() {
        // idempotent on already-absolute input
        for p in ["/", "/etc", "/home/user/docs"] {
            assert_eq!(resolve(p, "/anywhere", HOME), p);
        }
    }

    #[test]
    fn test_dot_and_dotdot() {
        assert_eq!(resolve(".", "/home/user", HOME), "/home/user");
        assert_eq!(resolve("..", "/home/user", HOME), "/home");
        assert_eq!(resolve("..", "/home", HOME), "/");
        assert_eq!(resolve("..", "/", HOME), "/");
    }

    #[test]
    fn test_dotdot_walk() {
        assert_eq!(resolve("../etc", "/home/user", HOME), "/home/etc");
        assert_eq!(resolve("../../etc", "/home/user", HOME), "/etc");
        assert_eq!(resolve("../../../../x", "/home", HOME), "/x");
        assert_eq!(resolve("../.", "/home/user", HOME), "/home");
        assert_eq!(resolve("../a/../b", "/home/user", HOME), "/home/b");
    }

    #[test]
    fn test_relative_join() {
        assert_eq!(resolve("docs", "/home/user", HOME), "/home/user/docs");
        assert_eq!(resolve("a/b", "/home/user", HOME), "/home/user/a/b");
        // no double slash when the current directory is the root
        assert_eq!(resolve("etc", "/", HOME), "/etc");
    }

    #[test]
    fn test_tilde_prefix_without_slash_is_relative() {
        assert_eq!(resolve("~user", "/tmp", HOME), "/tmp/~user");
    }

    #[test]
    fn test_parent_path() {
        assert_eq!(parent_path("/a/b/c"), "/a/b");
        assert_eq!(parent_path("/a"), "/");
        assert_eq!(parent_path("/"), "/");
    }

    #[test]
    fn test_display_path_round_trip() {
        assert_eq!(to_absolute_display_path("~", HOME), HOME);
        assert_eq!(to_absolute_display_path("~/docs", HOME), "/home/user/docs");
        assert_eq!(to_absolute_display_path("/etc", HOME), "/etc");

        assert_eq!(to_display_path(HOME, HOME), "~");
        assert_eq!(to_display_path("/home/user/docs", HOME), "~/docs");
        assert_eq!(to_display_path("/etc", HOME), "/etc");
        // sibling of home that shares a name prefix is not collapsed
        assert_eq!(to_display_path("/home/username", HOME), "/home/username");
    }
}
