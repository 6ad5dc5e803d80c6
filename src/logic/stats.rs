use serde::{Deserialize, Serialize};

use crate::model::Database;

/// How many positions hold a given antibody name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameStock {
    pub count: usize,
    /// Held somewhere, but in `low_stock_count` positions or fewer
    pub low_stock: bool,
}

/// Occupied positions, across all containers, whose name equals `name`
/// ignoring case and surrounding whitespace. A blank name counts nothing.
pub fn count_by_name(database: &Database, name: &str) -> usize {
    let wanted = name.trim().to_lowercase();
    if wanted.is_empty() {
        return 0;
    }
    database
        .containers
        .values()
        .flat_map(|container| container.occupied())
        .filter(|(_, sample)| sample.name.trim().to_lowercase() == wanted)
        .count()
}

pub fn name_stock(database: &Database, name: &str, low_stock_count: usize) -> NameStock {
    let count = count_by_name(database, name);
    NameStock {
        count,
        low_stock: count > 0 && count <= low_stock_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Container, Position, Sample};

    fn database() -> Database {
        let mut a = Container::new("A".to_string(), 2, 2);
        a.slots.insert(Position::new(1, 1), Sample::named("CD3"));
        a.slots.insert(Position::new(1, 2), Sample::named("cd3 "));
        a.slots.insert(Position::new(2, 1), Sample::named("CD4"));
        let mut b = Container::new("B".to_string(), 1, 1);
        b.slots.insert(Position::new(1, 1), Sample::named("Cd3"));

        let mut db = Database::new();
        db.containers.insert("a".to_string(), a);
        db.containers.insert("b".to_string(), b);
        db
    }

    #[test]
    fn test_count_by_name_is_case_insensitive() {
        let db = database();
        assert_eq!(count_by_name(&db, "cd3"), 3);
        assert_eq!(count_by_name(&db, " CD4"), 1);
        assert_eq!(count_by_name(&db, "CD8"), 0);
        assert_eq!(count_by_name(&db, ""), 0);
    }

    #[test]
    fn test_name_stock_flags_scarce_names() {
        let db = database();
        assert!(name_stock(&db, "CD3", 3).low_stock);
        assert!(!name_stock(&db, "CD3", 2).low_stock);
        assert!(!name_stock(&db, "CD8", 3).low_stock);
        assert_eq!(name_stock(&db, "CD4", 3).count, 1);
    }
}
