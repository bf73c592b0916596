//! Start the clock at login through an XDG autostart entry.

use crate::constant::{AUTOSTART_FILE, DEFAULT_WINDOW_TITLE};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum AutostartError {
    #[error("Cannot determine the executable path: {0}")]
    Executable(io::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub fn entry_path(autostart_dir: &Path) -> PathBuf {
    autostart_dir.join(AUTOSTART_FILE)
}

pub fn is_enabled(autostart_dir: &Path) -> bool {
    entry_path(autostart_dir).is_file()
}

/// Quote a path for the `Exec` key. Arguments are quoted, then the key's
/// string escapes are applied on top, so one backslash becomes four.
fn exec_value(exec: &Path) -> String {
    let mut quoted = String::from("\"");
    for c in exec.to_string_lossy().chars() {
        match c {
            '"' | '`' | '$' => {
                quoted.push_str("\\\\");
                quoted.push(c);
            }
            '\\' => quoted.push_str("\\\\\\\\"),
            '%' => quoted.push_str("%%"),
            '\n' => quoted.push_str("\\n"),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

fn desktop_entry(exec: &Path) -> String {
    format!(
        "[Desktop Entry]\n\
         Type=Application\n\
         Name={}\n\
         Exec={}\n\
         Hidden=false\n\
         NoDisplay=false\n\
         X-GNOME-Autostart-enabled=true\n",
        DEFAULT_WINDOW_TITLE,
        exec_value(exec)
    )
}

pub fn enable(autostart_dir: &Path, exec: &Path) -> Result<(), AutostartError> {
    fs::create_dir_all(autostart_dir)?;
    let path = entry_path(autostart_dir);
    fs::write(&path, desktop_entry(exec))?;
    info!("Autostart enabled: {:?}", path);
    Ok(())
}

/// Removing an entry that does not exist is not an error
pub fn disable(autostart_dir: &Path) -> Result<(), AutostartError> {
    let path = entry_path(autostart_dir);
    match fs::remove_file(&path) {
        Ok(()) => {
            info!("Autostart disabled: {:?}", path);
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Enable with the running executable, or disable
pub fn set_enabled(autostart_dir: &Path, enabled: bool) -> Result<(), AutostartError> {
    if enabled {
        let exec = std::env::current_exe().map_err(AutostartError::Executable)?;
        enable(autostart_dir, &exec)
    } else {
        disable(autostart_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_enable_and_disable() {
        let dir = std::env::temp_dir().join(format!("test_autostart_{}", Uuid::new_v4()));
        assert!(!is_enabled(&dir));

        enable(&dir, Path::new("/usr/bin/desk-clock")).unwrap();
        assert!(is_enabled(&dir));

        let content = fs::read_to_string(entry_path(&dir)).unwrap();
        assert!(content.starts_with("[Desktop Entry]\n"));
        assert!(content.contains("Type=Application\n"));
        assert!(content.contains("Exec=\"/usr/bin/desk-clock\"\n"));
        assert!(content.contains("X-GNOME-Autostart-enabled=true\n"));

        disable(&dir).unwrap();
        assert!(!is_enabled(&dir));
        // Second disable is a no-op
        disable(&dir).unwrap();

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_exec_value_quotes_reserved_characters() {
        assert_eq!(
            exec_value(Path::new("/opt/My Apps/desk-clock")),
            r#""/opt/My Apps/desk-clock""#
        );
        assert_eq!(
            exec_value(Path::new("/home/me/100%/desk-clock")),
            r#""/home/me/100%%/desk-clock""#
        );
        assert_eq!(
            exec_value(Path::new("/tmp/$HOME/a\"b`c/desk-clock")),
            r#""/tmp/\\$HOME/a\\"b\\`c/desk-clock""#
        );
        assert_eq!(
            exec_value(Path::new(r"/tmp/back\slash")),
            r#""/tmp/back\\\\slash""#
        );
    }

    #[test]
    fn test_entry_for_path_with_spaces() {
        let dir = std::env::temp_dir().join(format!("test_autostart_{}", Uuid::new_v4()));

        enable(&dir, Path::new("/opt/My Apps/desk-clock")).unwrap();
        let content = fs::read_to_string(entry_path(&dir)).unwrap();
        assert!(content.contains("Exec=\"/opt/My Apps/desk-clock\"\n"));

        let _ = fs::remove_dir_all(&dir);
    }
}
