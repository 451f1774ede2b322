//! Category facet counts over the whole catalog snapshot.

use std::collections::HashMap;

use crate::types::programme::{CategoryFacet, ProgrammeRecord};

/// Counts records per distinct `category`, busiest first.
///
/// Categories with equal counts keep the order in which they first appear in
/// the catalog, so repeated calls on the same snapshot agree.
pub fn category_facets(catalog: &[ProgrammeRecord]) -> Vec<CategoryFacet> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut facets: Vec<CategoryFacet> = Vec::new();

    for record in catalog {
        match index.get(record.category.as_str()) {
            Some(&i) => facets[i].count += 1,
            None => {
                index.insert(record.category.as_str(), facets.len());
                facets.push(CategoryFacet {
                    name: record.category.clone(),
                    count: 1,
                });
            }
        }
    }

    facets.sort_by(|a, b| b.count.cmp(&a.count));
    facets
}
