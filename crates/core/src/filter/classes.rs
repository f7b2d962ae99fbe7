//! Class list dimensions

use super::{Listable, SortValue};
use crate::models::{ClassStatus, ClassSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassField {
    Name,
    Teacher,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassFacet {
    Status,
    Level,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassFacetValue {
    Status(ClassStatus),
    Level(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassSortKey {
    Name,
    Progress,
    StartDate,
    Level,
}

impl Listable for ClassSummary {
    type Field = ClassField;
    type Facet = ClassFacet;
    type FacetValue = ClassFacetValue;
    type SortKey = ClassSortKey;

    fn text(&self, field: ClassField) -> Option<&str> {
        match field {
            ClassField::Name => Some(self.name.as_str()),
            ClassField::Teacher => self.teacher_name.as_deref(),
        }
    }

    fn facet(&self, facet: ClassFacet) -> ClassFacetValue {
        match facet {
            ClassFacet::Status => ClassFacetValue::Status(self.status),
            ClassFacet::Level => ClassFacetValue::Level(self.level),
        }
    }

    fn facet_of(value: ClassFacetValue) -> ClassFacet {
        match value {
            ClassFacetValue::Status(_) => ClassFacet::Status,
            ClassFacetValue::Level(_) => ClassFacet::Level,
        }
    }

    fn sort_value(&self, key: ClassSortKey) -> SortValue<'_> {
        match key {
            ClassSortKey::Name => SortValue::Text(&self.name),
            ClassSortKey::Progress => SortValue::Number(self.progress()),
            ClassSortKey::StartDate => {
                SortValue::Timestamp(self.start_date.and_then(|d| d.and_hms_opt(0, 0, 0)))
            }
            ClassSortKey::Level => SortValue::Number(f64::from(self.level)),
        }
    }
}
