//! Slot list dimensions

use chrono::NaiveDateTime;

use super::{Listable, SortValue};
use crate::models::{Shift, Slot, SlotStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotField {
    ClassName,
    RoomName,
    Teacher,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotFacet {
    Status,
    Shift,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotFacetValue {
    Status(SlotStatus),
    Shift(Shift),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotSortKey {
    /// Date and shift start, i.e. chronological
    StartsAt,
    ClassName,
    RoomName,
}

impl Listable for Slot {
    type Field = SlotField;
    type Facet = SlotFacet;
    type FacetValue = SlotFacetValue;
    type SortKey = SlotSortKey;

    fn text(&self, field: SlotField) -> Option<&str> {
        match field {
            SlotField::ClassName => Some(self.class.name.as_str()),
            SlotField::RoomName => Some(self.room.name.as_str()),
            SlotField::Teacher => self.teacher_name(),
        }
    }

    fn facet(&self, facet: SlotFacet) -> SlotFacetValue {
        match facet {
            SlotFacet::Status => SlotFacetValue::Status(self.status),
            SlotFacet::Shift => SlotFacetValue::Shift(self.shift),
        }
    }

    fn facet_of(value: SlotFacetValue) -> SlotFacet {
        match value {
            SlotFacetValue::Status(_) => SlotFacet::Status,
            SlotFacetValue::Shift(_) => SlotFacet::Shift,
        }
    }

    fn sort_value(&self, key: SlotSortKey) -> SortValue<'_> {
        match key {
            SlotSortKey::StartsAt => SortValue::Timestamp(Some(NaiveDateTime::new(
                self.date,
                self.shift.start_time(),
            ))),
            SlotSortKey::ClassName => SortValue::Text(&self.class.name),
            SlotSortKey::RoomName => SortValue::Text(&self.room.name),
        }
    }
}
