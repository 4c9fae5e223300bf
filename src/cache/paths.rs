// Cache and config path utilities.
// Constructs filesystem locations for widget slots, logs and the config file.

use std::path::PathBuf;

use directories::ProjectDirs;

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("net", "lamoss", "trendly")
}

/// Get the base cache directory (~/.cache/trendly on Linux).
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Path to the default config file.
pub fn config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Path to the log file used while the terminal widget owns the screen.
pub fn log_path() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join("trendly.log"))
}

/// Directory holding one slot file per widget group.
pub fn widgets_dir() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join("widgets"))
}

/// Path to a widget group's slot file inside `base`.
pub fn widget_slot_path_in(base: &std::path::Path, group: &str) -> PathBuf {
    base.join(format!("{}.json", sanitize_name(group)))
}

/// Path to a widget group's slot file in the default cache directory.
pub fn widget_slot_path(group: &str) -> Option<PathBuf> {
    widgets_dir().map(|dir| widget_slot_path_in(&dir, group))
}

/// Sanitize a name for use in filesystem paths.
/// Replaces problematic characters with underscores.
fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '.' => '_',
            _ => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("HomeWidgetPlugin"), "HomeWidgetPlugin");
        assert_eq!(sanitize_name("group.net.lamoss"), "group_net_lamoss");
        assert_eq!(sanitize_name("../escape"), "___escape");
    }

    #[test]
    fn test_widget_slot_path() {
        let path = widget_slot_path_in(Path::new("/tmp/widgets"), "HomeWidgetPlugin");
        assert_eq!(path, Path::new("/tmp/widgets/HomeWidgetPlugin.json"));
    }
}
