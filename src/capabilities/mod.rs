mod storage;

pub use self::storage::{
    Storage, StorageError, StorageKey, StorageOperation, StorageOutput, StorageResult,
    MAX_VALUE_BYTES,
};

pub use crux_core::render::Render;

use crate::app::App;
use crate::event::Event;

pub type AppRender = Render<Event>;
pub type AppStorage = Storage<Event>;

#[derive(crux_core::macros::Effect)]
#[effect(app = "App")]
pub struct Capabilities {
    pub render: Render<Event>,
    pub storage: Storage<Event>,
}
