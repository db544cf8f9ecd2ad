//! Design files: a JSON snapshot of the whole [`DeviceConfig`].

use std::fs;
use std::path::Path;

use ledtag_packet::SLOT_COUNT;
use serde::{Deserialize, Serialize};

use crate::config::DeviceConfig;
use crate::error::{DesignError, Result};
use crate::slot::MessageSlot;

/// Design file format written by this version.
pub const DESIGN_FORMAT: u32 = 1;

#[derive(Serialize)]
struct DesignFileRef<'a> {
    format: u32,
    slots: &'a [MessageSlot; SLOT_COUNT],
}

#[derive(Deserialize)]
struct DesignFile {
    format: u32,
    slots: [MessageSlot; SLOT_COUNT],
}

impl DeviceConfig {
    pub fn to_json(&self) -> Result<String> {
        let file = DesignFileRef {
            format: DESIGN_FORMAT,
            slots: self.slots(),
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    /// Parse a design. Anything other than exactly eight slots is rejected.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: DesignFile = serde_json::from_str(json)?;
        if file.format != DESIGN_FORMAT {
            return Err(DesignError::UnsupportedFormat(file.format));
        }
        Ok(Self::from_slots(file.slots))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?)?;
        tracing::debug!(path = %path.display(), "design saved");
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        tracing::debug!(path = %path.display(), "design loaded");
        Ok(config)
    }
}
