//! Shared fixture: both roles over a linked mock transport pair

#![allow(dead_code)]

use std::sync::Arc;

use iap_core::{ItemType, MockConfig, MockTransport};
use iap_emulator::{EmulatorConfig, IpodEmulator, PlayerHooks};
use iap_remote::{RemoteClient, RemoteConfig};
use parking_lot::Mutex;
use tracing_subscriber::EnvFilter;

/// Small in-memory library that records the actions it receives
#[derive(Default)]
pub struct Library {
    pub playlists: Vec<String>,
    pub songs: Vec<String>,
    pub elapsed_ms: Mutex<u32>,
    pub actions: Mutex<Vec<String>>,
}

impl Library {
    pub fn sample() -> Self {
        Self {
            playlists: vec![
                "Road Trip".into(),
                "Focus".into(),
                "Workout".into(),
                "Evening".into(),
                "Podcasts".into(),
            ],
            songs: vec!["Intro".into(), "Verse".into(), "Chorus".into()],
            ..Self::default()
        }
    }

    pub fn actions(&self) -> Vec<String> {
        self.actions.lock().clone()
    }

    fn record(&self, action: impl Into<String>) {
        self.actions.lock().push(action.into());
    }

    fn items(&self, item_type: ItemType) -> Option<&[String]> {
        match item_type {
            ItemType::Playlist => Some(&self.playlists),
            ItemType::Song => Some(&self.songs),
            _ => None,
        }
    }
}

impl PlayerHooks for Library {
    fn item_name(&self, item_type: ItemType, number: u32) -> String {
        self.items(item_type)
            .and_then(|items| items.get(number as usize))
            .cloned()
            .unwrap_or_else(|| format!("{} {}", item_type, number))
    }

    fn item_count(&self, item_type: ItemType) -> u32 {
        self.items(item_type).map_or(0, |items| items.len() as u32)
    }

    fn playlist_size(&self) -> u32 {
        self.songs.len() as u32
    }

    fn elapsed_time_ms(&self) -> u32 {
        *self.elapsed_ms.lock()
    }

    fn switch_item(&self, item_type: ItemType, number: u32) {
        self.record(format!("switch {} {}", item_type, number));
    }

    fn execute_playlist_jump(&self, playlist: u32, position: u32) {
        self.record(format!("jump playlist {} to {}", playlist, position));
    }

    fn play_pause(&self) {
        self.record("play_pause");
    }

    fn skip_forward(&self) {
        self.record("skip_forward");
    }

    fn button_released(&self) {
        self.record("released");
    }

    fn volume_up(&self) {
        self.record("volume_up");
    }
}

pub struct Fixture {
    pub client: RemoteClient,
    pub emulator: Arc<IpodEmulator>,
    pub library: Arc<Library>,
    pub accessory: Arc<MockTransport>,
    pub player: Arc<MockTransport>,
}

impl Fixture {
    pub fn new() -> Self {
        init_tracing();

        let (accessory, player) = MockTransport::pair(&MockConfig::default());
        let library = Arc::new(Library::sample());

        let emulator = Arc::new(IpodEmulator::new(
            player.clone(),
            &EmulatorConfig::default(),
            library.clone(),
        ));
        emulator.start_listener();

        let client = RemoteClient::new(accessory.clone(), RemoteConfig::default());

        Self {
            client,
            emulator,
            library,
            accessory,
            player,
        }
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Let spawned listener tasks drain their channels
pub async fn settle() {
    for _ in 0..50 {
        tokio::task::yield_now().await;
    }
}
