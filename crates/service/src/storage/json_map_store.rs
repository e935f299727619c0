use std::{
    borrow::Borrow,
    collections::BTreeMap,
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::ServiceError;

#[derive(Serialize)]
struct DocumentRef<'a, K, V> {
    objects: &'a BTreeMap<K, V>,
}

#[derive(Deserialize)]
#[serde(bound(deserialize = "K: Deserialize<'de> + Ord, V: Deserialize<'de>"))]
struct Document<K, V> {
    #[serde(default)]
    objects: BTreeMap<K, V>,
}

/// Generic JSON file-backed map store.
///
/// Persists a `BTreeMap<K, V>` as `{"objects": {...}}` and provides simple CRUD helpers.
/// Unknown top-level keys are ignored on load and a missing `objects` key reads as an empty
/// map. Every mutation goes through [`JsonMapStore::update_map`], which persists the new map
/// and restores the previous one if either the mutation or the write fails.
#[derive(Debug, Clone)]
pub struct JsonMapStore<K, V> {
    map: BTreeMap<K, V>,
    file_path: PathBuf,
}

impl<K, V> JsonMapStore<K, V>
where
    K: Ord + Clone + Serialize + DeserializeOwned,
    V: Clone + Serialize + DeserializeOwned,
{
    /// Empty store bound to `path`. Nothing is read or written.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { map: BTreeMap::new(), file_path: path.into() }
    }

    /// Store bound to `path`, hydrated from it when the file exists.
    pub fn open<P: Into<PathBuf>>(path: P) -> Result<Self, ServiceError> {
        let mut store = Self::new(path);
        store.reload()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Re-read the bound file; see [`JsonMapStore::load_from`].
    pub fn reload(&mut self) -> Result<(), ServiceError> {
        let path = self.file_path.clone();
        self.load_from(&path)
    }

    /// Replace the in-memory map with the contents of `path`.
    ///
    /// A missing file leaves the map empty. On a parse failure the current map is kept.
    pub fn load_from(&mut self, path: &Path) -> Result<(), ServiceError> {
        self.map = match read_document(path)? {
            Some(map) => map,
            None => {
                debug!(path = %path.display(), "data file not found; starting empty");
                BTreeMap::new()
            }
        };
        Ok(())
    }

    /// Write the map to the bound file.
    pub fn save(&self) -> Result<(), ServiceError> {
        self.save_to(&self.file_path)
    }

    /// Write the map to `path` via a sibling temp file and a rename.
    pub fn save_to(&self, path: &Path) -> Result<(), ServiceError> {
        let mut data = serde_json::to_vec_pretty(&DocumentRef { objects: &self.map })
            .map_err(|e| ServiceError::corrupt(path, e))?;
        data.push(b'\n');
        write_atomic(path, &data)
    }

    /// Keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.map.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.map.iter()
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.map.get(key)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.map.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Apply a mutation to the underlying map and persist it.
    ///
    /// Nothing is written when `f` fails. If `f` or the write fails the map is restored to
    /// its state before the call.
    pub fn update_map<F, R>(&mut self, f: F) -> Result<R, ServiceError>
    where
        F: FnOnce(&mut BTreeMap<K, V>) -> Result<R, ServiceError>,
    {
        let snapshot = self.map.clone();
        let out = match f(&mut self.map) {
            Ok(out) => out,
            Err(e) => {
                self.map = snapshot;
                return Err(e);
            }
        };
        if let Err(e) = self.save() {
            warn!(path = %self.file_path.display(), error = %e, "save failed; rolling back");
            self.map = snapshot;
            return Err(e);
        }
        Ok(out)
    }
}

fn read_document<K, V>(path: &Path) -> Result<Option<BTreeMap<K, V>>, ServiceError>
where
    K: Ord + DeserializeOwned,
    V: DeserializeOwned,
{
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(ServiceError::io(path, e)),
    };
    let value: serde_json::Value =
        serde_json::from_slice(&bytes).map_err(|e| ServiceError::corrupt(path, e))?;
    if !value.is_object() {
        return Err(ServiceError::corrupt(path, "top-level value is not an object"));
    }
    let doc: Document<K, V> =
        serde_json::from_value(value).map_err(|e| ServiceError::corrupt(path, e))?;
    Ok(Some(doc.objects))
}

fn write_atomic(path: &Path, data: &[u8]) -> Result<(), ServiceError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent).map_err(|e| ServiceError::io(&parent, e))?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "data".into());
    let tmp = parent.join(format!(".{}.{}.tmp", file_name, Uuid::new_v4().simple()));

    let written = fs::File::create(&tmp).and_then(|mut f| {
        f.write_all(data)?;
        f.sync_all()
    });
    if let Err(e) = written.and_then(|_| fs::rename(&tmp, path)) {
        let _ = fs::remove_file(&tmp);
        return Err(ServiceError::io(path, e));
    }
    debug!(path = %path.display(), bytes = data.len(), "data file written");
    Ok(())
}
