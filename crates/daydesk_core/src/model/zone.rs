//! Zone record: a titled, positioned grouping area on one date's board.

use crate::config::BoardConfig;
use crate::model::geometry::{Point, Rect, Size};
use crate::model::ids::{DateKey, EntityId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    pub id: EntityId,
    #[serde(default)]
    pub title: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub date: Option<DateKey>,
}

impl Zone {
    /// Creates a zone with default geometry and title.
    pub fn new(config: &BoardConfig, date: Option<DateKey>) -> Self {
        Self {
            id: EntityId::generate(),
            title: config.default_zone_title.clone(),
            x: config.default_zone_x,
            y: config.default_zone_y,
            width: config.default_zone_width,
            height: config.default_zone_height,
            date,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn set_origin(&mut self, origin: Point) {
        self.x = origin.x;
        self.y = origin.y;
    }

    pub fn set_size(&mut self, size: Size) {
        self.width = size.width;
        self.height = size.height;
    }

    /// Merges the fields present in `patch` into this zone.
    pub fn apply_patch(&mut self, patch: &ZonePatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        if let Some(width) = patch.width {
            self.width = width;
        }
        if let Some(height) = patch.height {
            self.height = height;
        }
        if let Some(date) = &patch.date {
            self.date = *date;
        }
    }
}

/// Partial zone update keyed by id. `None` fields are left untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct ZonePatch {
    pub id: EntityId,
    pub title: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub date: Option<Option<DateKey>>,
}

impl ZonePatch {
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            title: None,
            x: None,
            y: None,
            width: None,
            height: None,
            date: None,
        }
    }
}

impl From<&Zone> for ZonePatch {
    fn from(zone: &Zone) -> Self {
        Self {
            id: zone.id.clone(),
            title: Some(zone.title.clone()),
            x: Some(zone.x),
            y: Some(zone.y),
            width: Some(zone.width),
            height: Some(zone.height),
            date: Some(zone.date),
        }
    }
}
