//! Persistent key-value capability.
//!
//! The shell owns the actual backend (browser `localStorage`, platform
//! preferences). The core only ever reads or whole-value-overwrites three
//! well-known keys; reads that fail degrade to in-memory defaults and writes
//! are best-effort.

use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Values are tiny (a theme flag, a counter, a short JSON array); anything
/// bigger is a bug.
pub const MAX_VALUE_BYTES: usize = 64 * 1024;

/// The fixed set of keys this app persists. Raw names match the prototype's
/// `localStorage` keys so existing user data survives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StorageKey {
    Theme,
    MacCount,
    MacHistory,
}

impl StorageKey {
    pub fn raw(self) -> &'static str {
        match self {
            StorageKey::Theme => "smartcommute.theme",
            StorageKey::MacCount => "smartcommute.mac",
            StorageKey::MacHistory => "smartcommute.macHistory",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum StorageOperation {
    Get { key: StorageKey },
    Set { key: StorageKey, value: Vec<u8> },
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum StorageError {
    #[error("storage backend unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("value for {key} too large: {size} bytes exceeds {max}")]
    ValueTooLarge {
        key: String,
        size: usize,
        max: usize,
    },

    #[error("storage i/o failed: {message}")]
    Io { message: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum StorageOutput {
    /// Result of a `Get`; `None` means the key was absent.
    Value(Option<Vec<u8>>),
    /// Acknowledgement of a `Set`.
    Written,
}

pub type StorageResult = Result<StorageOutput, StorageError>;

impl Operation for StorageOperation {
    type Output = StorageResult;
}

pub struct Storage<Ev> {
    context: CapabilityContext<StorageOperation, Ev>,
}

impl<Ev> Capability<Ev> for Storage<Ev> {
    type Operation = StorageOperation;
    type MappedSelf<MappedEv> = Storage<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Storage::new(self.context.map_event(f))
    }
}

impl<Ev> Storage<Ev> {
    pub fn new(context: CapabilityContext<StorageOperation, Ev>) -> Self {
        Self { context }
    }
}

impl<Ev> Storage<Ev>
where
    Ev: Send + 'static,
{
    /// Read a key. Absence is not an error; the callback sees `Value(None)`.
    pub fn load<F>(&self, key: StorageKey, make_event: F)
    where
        F: FnOnce(StorageResult) -> Ev + Send + 'static,
    {
        let context = self.context.clone();
        self.context.spawn(async move {
            let result = context
                .request_from_shell(StorageOperation::Get { key })
                .await;
            context.update_app(make_event(result));
        });
    }

    /// Whole-value overwrite, fire-and-forget. Oversized values are rejected
    /// locally without a shell round trip.
    pub fn persist<F>(&self, key: StorageKey, value: Vec<u8>, make_event: F)
    where
        F: FnOnce(StorageResult) -> Ev + Send + 'static,
    {
        let context = self.context.clone();
        self.context.spawn(async move {
            if value.len() > MAX_VALUE_BYTES {
                let error = StorageError::ValueTooLarge {
                    key: key.raw().to_string(),
                    size: value.len(),
                    max: MAX_VALUE_BYTES,
                };
                context.update_app(make_event(Err(error)));
                return;
            }
            let result = context
                .request_from_shell(StorageOperation::Set { key, value })
                .await;
            context.update_app(make_event(result));
        });
    }
}
