use crate::model::ProductRecord;
use std::collections::HashSet;

// Criteria are inclusive sets composed with AND; an empty set places no
// restriction on that field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub names: HashSet<String>,
    pub brands: HashSet<String>,
    pub categories: HashSet<String>,
}

pub fn apply(records: &[ProductRecord], criteria: &FilterCriteria) -> Vec<ProductRecord> {
    let mut kept: Vec<ProductRecord> = records.to_vec();

    if !criteria.names.is_empty() {
        kept.retain(|r| criteria.names.contains(&r.name));
    }

    if !criteria.brands.is_empty() {
        kept.retain(|r| {
            r.brand
                .as_deref()
                .is_some_and(|b| criteria.brands.contains(b))
        });
    }

    if !criteria.categories.is_empty() {
        kept.retain(|r| {
            r.category
                .as_deref()
                .is_some_and(|c| criteria.categories.contains(c))
        });
    }

    kept
}

pub fn distinct_categories(records: &[ProductRecord]) -> Vec<String> {
    distinct(records.iter().filter_map(|r| r.category.clone()))
}

pub fn distinct_brands(records: &[ProductRecord]) -> Vec<String> {
    distinct(records.iter().filter_map(|r| r.brand.clone()))
}

fn distinct(values: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out: Vec<String> = values.filter(|v| seen.insert(v.clone())).collect();
    out.sort();
    out
}
