//! Input-path normalization for the CLI.
//!
//! Paths arrive as whatever the user pasted: quoted, `~`-prefixed, or a
//! Windows path copied out of the game's launcher while running under Wine.
//! All of those are mapped to a usable local path here.

use std::env;
use std::path::PathBuf;

/// Normalize a raw user-supplied path string.
pub fn resolve_input_path(raw: &str) -> PathBuf {
    let trimmed = strip_matching_quotes(raw.trim()).trim();

    if trimmed.is_empty() {
        return PathBuf::new();
    }

    if trimmed == "~" {
        if let Some(home) = env::var_os("HOME") {
            return PathBuf::from(home);
        }
    }

    if trimmed.starts_with("~/") || trimmed.starts_with("~\\") {
        if let Some(mut home) = env::var_os("HOME").map(PathBuf::from) {
            push_components(&mut home, &trimmed[2..].replace('\\', "/"));
            return home;
        }
    }

    // Windows drive prefix (C:\ or C:/), mapped through a Wine prefix. Z: is
    // Wine's view of the host root.
    let bytes = trimmed.as_bytes();
    if bytes.len() >= 3 && bytes[1] == b':' && (bytes[2] == b'\\' || bytes[2] == b'/') {
        let drive = trimmed.chars().next().unwrap_or('c');
        let remainder = trimmed[3..].replace('\\', "/");
        if drive.eq_ignore_ascii_case(&'z') {
            let mut path = PathBuf::from("/");
            push_components(&mut path, &remainder);
            return path;
        }
        if let Some(mut base) = wine_drive_base(drive) {
            push_components(&mut base, &remainder);
            return base;
        }
    }

    PathBuf::from(trimmed)
}

fn strip_matching_quotes(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .or_else(|| {
            value
                .strip_prefix('\'')
                .and_then(|rest| rest.strip_suffix('\''))
        })
        .unwrap_or(value)
}

fn wine_drive_base(drive: char) -> Option<PathBuf> {
    let prefix = env::var_os("WINEPREFIX").map(PathBuf::from).or_else(|| {
        env::var_os("HOME")
            .map(PathBuf::from)
            .map(|home| home.join(".wine"))
    })?;
    Some(prefix.join(format!("drive_{}", drive.to_ascii_lowercase())))
}

fn push_components(base: &mut PathBuf, components: &str) {
    for part in components.split('/') {
        if !part.is_empty() {
            base.push(part);
        }
    }
}
