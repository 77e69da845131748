//! JSON file codec for the contact directory.
//!
//! Wire form is a single object keyed by `"<Name> <Surname>"`:
//!
//! ```json
//! {
//!     "Ivan Petrov": {
//!         "phone": "89991234567",
//!         "dob": "01.02.1990"
//!     }
//! }
//! ```
//!
//! An unknown birth date is written as `""`.
//!
//! Keys are split at the first space on decode. A name that itself contains
//! a space therefore does not survive a round trip unchanged.

use crate::model::contact::{BirthDate, Contact, ContactId, Phone};
use crate::repo::directory::{ContactRepository, Directory};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use serde_json::Serializer;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

const KEY_SEPARATOR: char = ' ';
const INDENT: &[u8] = b"    ";

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence error for directory load/save.
#[derive(Debug)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Backing file exists but is not valid JSON or holds invalid records.
    Corrupt(String),
    /// Serializing the directory failed.
    Encode(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to access `{}`: {source}", path.display())
            }
            Self::Corrupt(message) => write!(f, "corrupt contact store: {message}"),
            Self::Encode(err) => write!(f, "failed to encode contact store: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Corrupt(_) => None,
            Self::Encode(err) => Some(err),
        }
    }
}

/// Wire record stored under each `"<Name> <Surname>"` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireContact {
    pub phone: String,
    /// `dd.mm.yyyy`, or empty when unknown.
    #[serde(default)]
    pub dob: String,
}

/// Serializable form of the whole directory.
pub type WireDirectory = BTreeMap<String, WireContact>;

/// Converts the directory to its wire form.
pub fn encode(directory: &Directory) -> WireDirectory {
    directory
        .iter()
        .map(|(id, contact)| {
            let wire = WireContact {
                phone: contact.phone.as_str().to_string(),
                dob: contact
                    .dob
                    .map(|dob| dob.to_string())
                    .unwrap_or_default(),
            };
            (encode_key(id), wire)
        })
        .collect()
}

/// Rebuilds a directory from its wire form.
///
/// Phones are re-normalized, so legacy `+7…` values load as `8…`.
///
/// Keys that split to the same identity (`"Mary ann Smith"` and
/// `"Mary Ann smith"`) collapse into one contact; the entry later in key
/// order wins.
///
/// # Errors
/// - `Corrupt` when a key has no separator or a field fails validation.
pub fn decode(wire: WireDirectory) -> StoreResult<Directory> {
    let mut directory = Directory::new();
    let mut collisions = 0usize;

    for (key, record) in wire {
        let id = decode_key(&key)?;
        let phone = Phone::parse(&record.phone).map_err(|err| corrupt_entry(&key, err))?;
        let dob = match record.dob.trim() {
            "" => None,
            text => Some(BirthDate::parse(text).map_err(|err| corrupt_entry(&key, err))?),
        };

        if directory.put(id, Contact::new(phone, dob)).is_some() {
            collisions += 1;
        }
    }

    if collisions > 0 {
        warn!(
            "event=store_decode module=store status=ok identity_collisions={} count={}",
            collisions,
            directory.len()
        );
    }
    Ok(directory)
}

/// Renders the directory as pretty-printed JSON with 4-space indentation.
pub fn to_json_bytes(directory: &Directory) -> StoreResult<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut serializer =
        Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(INDENT));
    encode(directory)
        .serialize(&mut serializer)
        .map_err(StoreError::Encode)?;
    buffer.push(b'\n');
    Ok(buffer)
}

/// Parses JSON text into a directory.
pub fn from_json_str(text: &str) -> StoreResult<Directory> {
    let wire: WireDirectory = serde_json::from_str(text)
        .map_err(|err| StoreError::Corrupt(format!("not a valid contact map: {err}")))?;
    decode(wire)
}

fn encode_key(id: &ContactId) -> String {
    format!("{}{KEY_SEPARATOR}{}", id.name(), id.surname())
}

fn decode_key(key: &str) -> StoreResult<ContactId> {
    let (name, surname) = key.split_once(KEY_SEPARATOR).ok_or_else(|| {
        StoreError::Corrupt(format!("key `{key}` is not a `<name> <surname>` pair"))
    })?;
    ContactId::new(name, surname).map_err(|err| corrupt_entry(key, err))
}

fn corrupt_entry(key: &str, err: impl Display) -> StoreError {
    StoreError::Corrupt(format!("entry `{key}`: {err}"))
}

/// Load/save contract for whole-directory persistence.
pub trait DirectoryStore {
    fn load(&self) -> StoreResult<Directory>;
    fn save(&self, directory: &Directory) -> StoreResult<()>;
}

/// Directory persisted as one JSON file, fully rewritten on every save.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DirectoryStore for JsonFileStore {
    /// Reads the backing file.
    ///
    /// # Side effects
    /// - Emits `store_load` logging events with entry count and duration.
    fn load(&self) -> StoreResult<Directory> {
        let started_at = Instant::now();

        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                warn!(
                    "event=store_load module=store status=ok mode=missing_file count=0 duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                return Ok(Directory::new());
            }
            Err(err) => {
                error!(
                    "event=store_load module=store status=error error_code=io_failed error={}",
                    err
                );
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source: err,
                });
            }
        };

        match from_json_str(&text) {
            Ok(directory) => {
                info!(
                    "event=store_load module=store status=ok mode=file count={} duration_ms={}",
                    directory.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(directory)
            }
            Err(err) => {
                error!(
                    "event=store_load module=store status=error error_code=corrupt_store duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Err(err)
            }
        }
    }

    /// Overwrites the backing file with the full directory.
    fn save(&self, directory: &Directory) -> StoreResult<()> {
        let started_at = Instant::now();
        let bytes = to_json_bytes(directory)?;

        if let Err(err) = std::fs::write(&self.path, bytes) {
            error!(
                "event=store_save module=store status=error error_code=io_failed error={}",
                err
            );
            return Err(StoreError::Io {
                path: self.path.clone(),
                source: err,
            });
        }

        info!(
            "event=store_save module=store status=ok count={} duration_ms={}",
            directory.len(),
            started_at.elapsed().as_millis()
        );
        Ok(())
    }
}
