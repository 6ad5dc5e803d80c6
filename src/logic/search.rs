use serde::{Deserialize, Serialize};

use crate::model::{Database, Id, Position};

/// A search hit with enough context to locate and label it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchMatch {
    pub container_id: Id,
    pub container_name: String,
    pub position: Position,
    pub name: String,
    pub clone_id: String,
    pub vendor: String,
    pub catalog_number: String,
    pub host_species: String,
}

/// Case-insensitive substring search over every occupied position.
///
/// The non-empty descriptive fields of a sample are joined with single
/// spaces and matched as one string. A blank query yields nothing. Hits come
/// back in container id order, then row-major position order.
pub fn search(database: &Database, query: &str) -> Vec<SearchMatch> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let mut matches = Vec::new();
    for (container_id, container) in &database.containers {
        for (position, sample) in container.occupied() {
            let haystack = sample
                .searchable_fields()
                .iter()
                .filter(|field| !field.is_empty())
                .copied()
                .collect::<Vec<_>>()
                .join(" ")
                .to_lowercase();

            if haystack.contains(&needle) {
                matches.push(SearchMatch {
                    container_id: container_id.clone(),
                    container_name: container.name.clone(),
                    position,
                    name: sample.name.clone(),
                    clone_id: sample.clone_id.clone(),
                    vendor: sample.vendor.clone(),
                    catalog_number: sample.catalog_number.clone(),
                    host_species: sample.host_species.clone(),
                });
            }
        }
    }

    log::debug!("Search '{}' matched {} position(s)", needle, matches.len());
    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Container, Sample};

    fn database() -> Database {
        let mut first = Container::new("Freezer A".to_string(), 3, 3);
        first.slots.insert(
            Position::new(2, 1),
            Sample {
                vendor: "Abcam".to_string(),
                remark: "Works well for IHC".to_string(),
                ..Sample::named("Anti-GFP")
            },
        );
        first.slots.insert(
            Position::new(1, 3),
            Sample {
                clone_id: "OKT3".to_string(),
                ..Sample::named("CD3")
            },
        );
        first.slots.insert(Position::new(3, 3), Sample::named(""));

        let mut second = Container::new("Fridge".to_string(), 2, 2);
        second.slots.insert(
            Position::new(1, 1),
            Sample {
                host_species: "Rabbit".to_string(),
                ..Sample::named("anti-gfp")
            },
        );

        let mut db = Database::new();
        db.containers.insert("box_a".to_string(), first);
        db.containers.insert("box_b".to_string(), second);
        db
    }

    #[test]
    fn test_blank_query_returns_nothing() {
        let db = database();
        assert!(search(&db, "").is_empty());
        assert!(search(&db, "   ").is_empty());
    }

    #[test]
    fn test_case_insensitive_across_containers() {
        let matches = search(&database(), "GFP");
        let located: Vec<_> = matches
            .iter()
            .map(|m| (m.container_id.as_str(), m.position.key()))
            .collect();
        assert_eq!(located, vec![("box_a", "2-1".to_string()), ("box_b", "1-1".to_string())]);
        assert_eq!(matches[0].container_name, "Freezer A");
        assert_eq!(matches[0].vendor, "Abcam");
        assert_eq!(matches[1].host_species, "Rabbit");
    }

    #[test]
    fn test_matches_secondary_fields() {
        let db = database();
        assert_eq!(search(&db, "okt3")[0].name, "CD3");
        assert_eq!(search(&db, "ihc")[0].name, "Anti-GFP");
        assert!(search(&db, "nothing like this").is_empty());
    }

    #[test]
    fn test_results_are_row_major_within_container() {
        let matches = search(&database(), "c");
        let positions: Vec<_> = matches
            .iter()
            .filter(|m| m.container_id == "box_a")
            .map(|m| m.position)
            .collect();
        assert_eq!(positions, vec![Position::new(1, 3), Position::new(2, 1)]);
    }
}
