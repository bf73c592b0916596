//! Background worker for disk writes and imports, so the UI thread never
//! blocks on the filesystem.

use crate::backend::hand_backend::import_hand_set;
use crate::backend::texture_backend::import_texture;
use crate::backend::theme_backend::ThemeStore;
use crate::config::{AppPaths, Settings, store_settings};
use crate::theme::Theme;
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender};
use std::thread;
use tracing::error;

pub enum SaverMessage {
    SaveSettings(Settings),
    SaveTheme { name: String, theme: Theme },
    ImportTexture(PathBuf),
    ImportHandSet(PathBuf),
}

pub enum SaverResponse {
    ThemeSaved(String),
    ThemeSaveFailed { name: String, reason: String },
    TextureImported(String),
    HandSetImported(String),
    Failed(String),
}

pub struct Saver {
    paths: AppPaths,
    receiver: Receiver<SaverMessage>,
    response_sender: Sender<SaverResponse>,
}

impl Saver {
    pub fn new(
        paths: AppPaths,
        receiver: Receiver<SaverMessage>,
        response_sender: Sender<SaverResponse>,
    ) -> Self {
        Self {
            paths,
            receiver,
            response_sender,
        }
    }

    pub fn run(&self) {
        let store = ThemeStore::new(self.paths.themes_dir());

        while let Ok(message) = self.receiver.recv() {
            let response = match message {
                SaverMessage::SaveSettings(settings) => match store_settings(&settings) {
                    Ok(()) => continue,
                    Err(e) => SaverResponse::Failed(format!("Failed to save settings: {}", e)),
                },
                SaverMessage::SaveTheme { name, theme } => match store.write(&name, &theme) {
                    Ok(()) => SaverResponse::ThemeSaved(name),
                    Err(e) => {
                        let reason = format!("Failed to save theme '{}': {}", name, e);
                        error!("{}", reason);
                        SaverResponse::ThemeSaveFailed { name, reason }
                    }
                },
                SaverMessage::ImportTexture(path) => {
                    match import_texture(&path, &self.paths.user_textures_dir()) {
                        Ok(name) => SaverResponse::TextureImported(name),
                        Err(e) => SaverResponse::Failed(format!("Failed to import texture: {}", e)),
                    }
                }
                SaverMessage::ImportHandSet(path) => {
                    match import_hand_set(&path, &self.paths.user_hands_dir()) {
                        Ok(name) => SaverResponse::HandSetImported(name),
                        Err(e) => {
                            SaverResponse::Failed(format!("Failed to import hand set: {}", e))
                        }
                    }
                }
            };

            if let SaverResponse::Failed(reason) = &response {
                error!("{}", reason);
            }
            if let Err(e) = self.response_sender.send(response) {
                error!("Failed to send saver response: {}", e);
            }
        }
    }
}

pub fn spawn_saver(paths: AppPaths) -> (Sender<SaverMessage>, Receiver<SaverResponse>) {
    let (sender, receiver) = std::sync::mpsc::channel();
    let (response_sender, response_receiver) = std::sync::mpsc::channel();
    thread::spawn(move || {
        let saver = Saver::new(paths, receiver, response_sender);
        saver.run();
    });
    (sender, response_receiver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::Duration;
    use uuid::Uuid;

    #[test]
    fn test_saver_writes_theme_and_reports() {
        let root = std::env::temp_dir().join(format!("test_saver_{}", Uuid::new_v4()));
        let paths = AppPaths::with_roots(&root.join("data"), &root.join("assets"));
        let (sender, receiver) = spawn_saver(paths.clone());

        let mut theme = Theme::default();
        theme.rim_width = 0.05;
        sender
            .send(SaverMessage::SaveTheme {
                name: "night".to_string(),
                theme: theme.clone(),
            })
            .unwrap();

        match receiver.recv_timeout(Duration::from_secs(5)).unwrap() {
            SaverResponse::ThemeSaved(name) => assert_eq!(name, "night"),
            _ => panic!("expected ThemeSaved"),
        }
        let stored = ThemeStore::new(paths.themes_dir()).read("night").unwrap();
        assert_eq!(stored, theme);

        sender
            .send(SaverMessage::ImportTexture(root.join("missing.png")))
            .unwrap();
        assert!(matches!(
            receiver.recv_timeout(Duration::from_secs(5)).unwrap(),
            SaverResponse::Failed(_)
        ));

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_saver_reports_failed_theme_write_by_name() {
        let root = std::env::temp_dir().join(format!("test_saver_{}", Uuid::new_v4()));
        let paths = AppPaths::with_roots(&root.join("data"), &root.join("assets"));
        // A file where the themes directory should be
        fs::create_dir_all(&paths.data_dir).unwrap();
        fs::write(paths.themes_dir(), "not a directory").unwrap();

        let (sender, receiver) = spawn_saver(paths.clone());
        sender
            .send(SaverMessage::SaveTheme {
                name: "night".to_string(),
                theme: Theme::default(),
            })
            .unwrap();

        match receiver.recv_timeout(Duration::from_secs(5)).unwrap() {
            SaverResponse::ThemeSaveFailed { name, reason } => {
                assert_eq!(name, "night");
                assert!(reason.contains("night"));
            }
            _ => panic!("expected ThemeSaveFailed"),
        }

        let _ = fs::remove_dir_all(&root);
    }
}
