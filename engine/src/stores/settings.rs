//! Process-wide user settings cache
//!
//! Thin cache over the settings collaborator: reads are synchronous, writes
//! notify subscribers synchronously and persist in the background of the
//! calling task. Persistence failures are logged and swallowed; the cue
//! logic must keep working with the in-memory value.

use super::{Listener, Listeners, SubscriptionId};
use crate::repositories::SettingsRepository;
use fittrack_shared::UserSettings;
use std::sync::{Arc, Mutex};
use tracing::warn;

pub struct SettingsStore {
    repo: Arc<dyn SettingsRepository>,
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    current: UserSettings,
    listeners: Listeners<UserSettings>,
}

impl SettingsStore {
    pub fn new(repo: Arc<dyn SettingsRepository>) -> Self {
        Self {
            repo,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Load persisted settings into the cache, keeping defaults when none
    /// exist or the load fails
    pub async fn hydrate(&self) {
        match self.repo.load().await {
            Ok(Some(settings)) => self.replace(settings),
            Ok(None) => {}
            Err(error) => warn!(%error, "failed to load settings, using defaults"),
        }
    }

    pub fn get(&self) -> UserSettings {
        self.inner.lock().unwrap().current
    }

    /// Update the cache, notify subscribers, then persist; a failed persist
    /// keeps the in-memory value
    pub async fn update(&self, settings: UserSettings) {
        self.replace(settings);
        if let Err(error) = self.repo.save(&settings).await {
            warn!(%error, "failed to persist settings");
        }
    }

    pub fn subscribe(&self, listener: Listener<UserSettings>) -> SubscriptionId {
        self.inner.lock().unwrap().listeners.add(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.inner.lock().unwrap().listeners.remove(id);
    }

    fn replace(&self, settings: UserSettings) {
        let listeners = {
            let mut inner = self.inner.lock().unwrap();
            inner.current = settings;
            inner.listeners.snapshot()
        };
        for listener in listeners {
            listener(Some(&settings));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::InMemorySettingsRepository;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn muted() -> UserSettings {
        UserSettings {
            sound_enabled: false,
            vibration_enabled: false,
            auto_brightness: false,
        }
    }

    #[tokio::test]
    async fn update_notifies_and_persists() {
        let repo = Arc::new(InMemorySettingsRepository::default());
        let store = SettingsStore::new(repo.clone());
        let calls = Arc::new(AtomicUsize::new(0));

        let calls_ref = Arc::clone(&calls);
        store.subscribe(Arc::new(move |_| {
            calls_ref.fetch_add(1, Ordering::SeqCst);
        }));

        store.update(muted()).await;
        assert_eq!(store.get(), muted());
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // A fresh store hydrates to the persisted value
        let fresh = SettingsStore::new(repo);
        fresh.hydrate().await;
        assert_eq!(fresh.get(), muted());
    }

    #[tokio::test]
    async fn hydrate_keeps_defaults_when_nothing_is_persisted() {
        let store = SettingsStore::new(Arc::new(InMemorySettingsRepository::default()));
        store.hydrate().await;
        assert_eq!(store.get(), UserSettings::default());
    }
}
