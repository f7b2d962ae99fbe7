//! Entrance-test criteria dimensions

use super::{Listable, SortValue};
use crate::models::EntranceCriterion;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CriterionField {
    Name,
    Description,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CriterionFacet {
    EntranceTest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CriterionFacetValue {
    EntranceTest(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CriterionSortKey {
    Name,
    Weight,
}

impl Listable for EntranceCriterion {
    type Field = CriterionField;
    type Facet = CriterionFacet;
    type FacetValue = CriterionFacetValue;
    type SortKey = CriterionSortKey;

    fn text(&self, field: CriterionField) -> Option<&str> {
        match field {
            CriterionField::Name => Some(self.name.as_str()),
            CriterionField::Description => self.description.as_deref(),
        }
    }

    fn facet(&self, facet: CriterionFacet) -> CriterionFacetValue {
        match facet {
            CriterionFacet::EntranceTest => CriterionFacetValue::EntranceTest(self.for_entrance_test),
        }
    }

    fn facet_of(value: CriterionFacetValue) -> CriterionFacet {
        match value {
            CriterionFacetValue::EntranceTest(_) => CriterionFacet::EntranceTest,
        }
    }

    fn sort_value(&self, key: CriterionSortKey) -> SortValue<'_> {
        match key {
            CriterionSortKey::Name => SortValue::Text(&self.name),
            CriterionSortKey::Weight => SortValue::Number(self.weight),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{ListQuery, SortDirection};

    fn make_criterion(id: i64, name: &str, weight: f64, entrance: bool) -> EntranceCriterion {
        EntranceCriterion {
            id,
            name: name.to_string(),
            weight,
            description: None,
            for_entrance_test: entrance,
        }
    }

    #[test]
    fn test_entrance_filter_and_weight_sort() {
        let criteria = vec![
            make_criterion(1, "Rhythm", 20.0, true),
            make_criterion(2, "Theory", 30.0, false),
            make_criterion(3, "Technique", 40.0, true),
            make_criterion(4, "Expression", 20.0, true),
        ];

        let mut query = ListQuery::<EntranceCriterion>::new(vec![CriterionField::Name]);
        query.toggle(CriterionFacetValue::EntranceTest(true));
        query.set_sort(CriterionSortKey::Weight, SortDirection::Descending);

        let ids: Vec<i64> = query.apply(&criteria).iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![3, 1, 4]);
    }
}
