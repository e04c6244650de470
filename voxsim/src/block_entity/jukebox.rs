//! Jukebox block entity.

use serde::{Serialize, Deserialize};


#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JukeboxBlockEntity {
    /// The item id of the disc currently in the jukebox.
    pub disc: Option<u16>,
}
