use std::{collections::BTreeMap, fmt, sync::Mutex};

use super::StorageBackend;

/// Values are credentials so only the keys are ever printed
fn stored_keys(items: &Mutex<BTreeMap<String, String>>) -> Vec<String> {
    items
        .lock()
        .expect("mutex poisoned")
        .keys()
        .cloned()
        .collect()
}

#[derive(Default)]
pub struct MemoryStorage {
    items: Mutex<BTreeMap<String, String>>,
}

impl fmt::Debug for MemoryStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryStorage")
            .field("keys", &stored_keys(&self.items))
            .finish()
    }
}

impl MemoryStorage {
    pub fn is_empty(&self) -> bool {
        self.items.lock().expect("mutex poisoned").is_empty()
    }
}

impl StorageBackend for MemoryStorage {
    fn get_item(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.items.lock().expect("mutex poisoned").get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.items
            .lock()
            .expect("mutex poisoned")
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> anyhow::Result<()> {
        self.items.lock().expect("mutex poisoned").remove(key);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod file {
    use std::{collections::BTreeMap, fmt, fs, path::PathBuf, sync::Mutex};

    use anyhow::Context as _;
    use tracing::debug;

    use super::{stored_keys, StorageBackend};

    /// Keeps all items in memory and rewrites the whole file after every
    /// change
    pub struct FileStorage {
        path: PathBuf,
        items: Mutex<BTreeMap<String, String>>,
    }

    impl fmt::Debug for FileStorage {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("FileStorage")
                .field("path", &self.path)
                .field("keys", &stored_keys(&self.items))
                .finish()
        }
    }

    impl FileStorage {
        pub fn open<P: Into<PathBuf>>(path: P) -> anyhow::Result<Self> {
            let path = path.into();
            debug!(?path, "opening storage file");
            let items = if path.exists() {
                let contents = fs::read_to_string(&path)
                    .with_context(|| format!("failed to read storage file: {path:?}"))?;
                serde_json::from_str(&contents)
                    .with_context(|| format!("storage file is not a json object: {path:?}"))?
            } else {
                debug!("storage file does not exist yet, starting empty");
                BTreeMap::new()
            };
            Ok(Self {
                path,
                items: Mutex::new(items),
            })
        }

        fn save(&self, items: &BTreeMap<String, String>) -> anyhow::Result<()> {
            if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create folder: {parent:?}"))?;
            }
            let json =
                serde_json::to_string_pretty(items).context("failed to serialize storage")?;
            fs::write(&self.path, json)
                .with_context(|| format!("failed to write storage file: {:?}", self.path))
        }
    }

    impl StorageBackend for FileStorage {
        fn get_item(&self, key: &str) -> anyhow::Result<Option<String>> {
            Ok(self.items.lock().expect("mutex poisoned").get(key).cloned())
        }

        fn set_item(&self, key: &str, value: &str) -> anyhow::Result<()> {
            let mut items = self.items.lock().expect("mutex poisoned");
            items.insert(key.to_string(), value.to_string());
            self.save(&items)
        }

        fn remove_item(&self, key: &str) -> anyhow::Result<()> {
            let mut items = self.items.lock().expect("mutex poisoned");
            if items.remove(key).is_some() {
                self.save(&items)
            } else {
                Ok(())
            }
        }
    }

}

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;

#[cfg(target_arch = "wasm32")]
mod local {
    use anyhow::{anyhow, Context as _};

    use super::StorageBackend;

    /// Looks up `window.localStorage` on every call because the handle is not
    /// `Send`
    #[derive(Debug)]
    pub struct LocalStorage {
        _private: (),
    }

    impl LocalStorage {
        pub fn try_new() -> anyhow::Result<Self> {
            storage()?;
            Ok(Self { _private: () })
        }
    }

    fn storage() -> anyhow::Result<web_sys::Storage> {
        web_sys::window()
            .context("no window found")?
            .local_storage()
            .map_err(|e| anyhow!("failed to access local storage: {e:?}"))?
            .context("local storage is disabled")
    }

    impl StorageBackend for LocalStorage {
        fn get_item(&self, key: &str) -> anyhow::Result<Option<String>> {
            storage()?
                .get_item(key)
                .map_err(|e| anyhow!("failed to get {key:?}: {e:?}"))
        }

        fn set_item(&self, key: &str, value: &str) -> anyhow::Result<()> {
            storage()?
                .set_item(key, value)
                .map_err(|e| anyhow!("failed to set {key:?}: {e:?}"))
        }

        fn remove_item(&self, key: &str) -> anyhow::Result<()> {
            storage()?
                .remove_item(key)
                .map_err(|e| anyhow!("failed to remove {key:?}: {e:?}"))
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use local::LocalStorage;
