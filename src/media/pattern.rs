use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;

/// Expand a mount-point pattern into the existing paths it names, sorted.
///
/// `*` and `?` may appear in any component. A wildcard component never matches
/// hidden entries unless the component itself starts with a dot.
pub fn expand(pattern: &str) -> Vec<PathBuf> {
    let pattern = Path::new(pattern);
    let mut current: Vec<PathBuf> = if pattern.is_absolute() {
        Vec::new()
    } else {
        vec![PathBuf::from(".")]
    };

    for component in pattern.components() {
        current = match component {
            Component::Prefix(prefix) => vec![PathBuf::from(prefix.as_os_str())],
            Component::RootDir => {
                if current.is_empty() {
                    vec![PathBuf::from("/")]
                } else {
                    current.iter().map(|p| p.join("/")).collect()
                }
            }
            Component::CurDir => continue,
            Component::ParentDir => current.iter().map(|p| p.join("..")).collect(),
            Component::Normal(name) => {
                let name = name.to_string_lossy();
                if has_wildcard(&name) {
                    current
                        .iter()
                        .flat_map(|dir| matching_children(dir, &name))
                        .collect()
                } else {
                    current
                        .iter()
                        .map(|p| p.join(name.as_ref()))
                        .filter(|p| p.exists())
                        .collect()
                }
            }
        };
        if current.is_empty() {
            break;
        }
    }

    current.sort();
    current
}

fn has_wildcard(component: &str) -> bool {
    component.contains(['*', '?'])
}

fn matching_children(dir: &Path, component: &str) -> Vec<PathBuf> {
    let allow_hidden = component.starts_with('.');
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| {
            let name = e.file_name().to_string_lossy();
            (allow_hidden || !name.starts_with('.')) && wildcard_match(component, &name)
        })
        .map(|e| e.into_path())
        .collect()
}

/// Match a single path component against a pattern with `*` (any run of
/// characters) and `?` (exactly one character).
pub fn wildcard_match(pattern: &str, name: &str) -> bool {
    let p: Vec<char> = pattern.chars().collect();
    let n: Vec<char> = name.chars().collect();
    let (mut pi, mut ni) = (0, 0);
    // Last `*` seen and the name position it is currently absorbing up to.
    let mut star: Option<(usize, usize)> = None;

    while ni < n.len() {
        if pi < p.len() && p[pi] == '*' {
            star = Some((pi, ni));
            pi += 1;
        } else if pi < p.len() && (p[pi] == '?' || p[pi] == n[ni]) {
            pi += 1;
            ni += 1;
        } else if let Some((sp, sn)) = star {
            pi = sp + 1;
            ni = sn + 1;
            star = Some((sp, sn + 1));
        } else {
            return false;
        }
    }

    p[pi..].iter().all(|&c| c == '*')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_and_single_char() {
        assert!(wildcard_match("usb", "usb"));
        assert!(!wildcard_match("usb", "usb0"));
        assert!(wildcard_match("usb?", "usb0"));
        assert!(!wildcard_match("usb?", "usb"));
    }

    #[test]
    fn star_matches_any_run() {
        assert!(wildcard_match("*", ""));
        assert!(wildcard_match("*", "CARTRIDGE"));
        assert!(wildcard_match("CART*", "CART"));
        assert!(wildcard_match("*-01", "disc-01"));
        assert!(wildcard_match("a*b*c", "axxbyyc"));
        assert!(!wildcard_match("a*b*c", "axxbyy"));
        assert!(wildcard_match("**?", "x"));
    }
}
