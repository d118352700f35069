use std::collections::HashSet;

use sprig_core::Location;
use sprig_index::{Bean, IndexElement, InjectionPoint};
use sprig_java::names;

use crate::SpringIde;

const QUALIFYING: [&str; 3] = [names::QUALIFIER, names::NAMED_JAKARTA, names::NAMED_JAVAX];

impl SpringIde {
    /// Every place `value` names a bean: bean declarations called `value` and qualifier
    /// attributes equal to `value` on beans or their injection points.
    pub fn provide_references(&self, value: &str) -> Vec<Location> {
        let mut seen = HashSet::new();
        let mut locations = Vec::new();
        let mut push = |location: &Location| {
            if seen.insert(location.clone()) {
                locations.push(location.clone());
            }
        };

        for snapshot in self.view.files() {
            for tree in snapshot.walk() {
                let element = &tree.element;
                if let Some(bean) = element.variant::<Bean>() {
                    if bean.name == value {
                        push(&element.location);
                    }
                } else if element.variant::<InjectionPoint>().is_none() {
                    continue;
                }
                for location in qualifier_values(element, value) {
                    push(location);
                }
            }
        }
        locations
    }
}

fn qualifier_values<'e>(
    element: &'e IndexElement,
    value: &'e str,
) -> impl Iterator<Item = &'e Location> + 'e {
    element
        .annotations
        .iter()
        .filter(|annotation| QUALIFYING.contains(&annotation.annotation_type.as_str()))
        .flat_map(|annotation| annotation.attribute("value"))
        .filter(move |attribute| attribute.name == value)
        .map(|attribute| &attribute.location)
}
