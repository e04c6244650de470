//! Sign block entity.

use serde::{Serialize, Deserialize};


#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignBlockEntity {
    /// Text lines of this sign block.
    pub text: Vec<String>,
}
