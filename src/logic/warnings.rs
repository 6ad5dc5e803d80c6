use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::logic::quantity::{assess, Measure};
use crate::model::{AmountUnit, Database, Id, Position};

/// A sample whose remaining quantity is at or below its own threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warning {
    pub container_id: Id,
    pub container_name: String,
    pub position: Position,
    pub name: String,
    pub vendor: String,
    pub remaining: f64,
    pub unit: AmountUnit,
    pub threshold: f64,
}

/// Low-stock samples across the whole database, most urgent first.
///
/// Only samples with a readable threshold and a computable remaining
/// quantity take part. Equal remaining quantities keep scan order.
pub fn list_warnings(database: &Database) -> Vec<Warning> {
    let warnings = database
        .containers
        .iter()
        .flat_map(|(container_id, container)| {
            container.occupied().filter_map(move |(position, sample)| {
                let status = assess(sample);
                if !status.low_stock {
                    return None;
                }
                let (Measure::Known(remaining), Measure::Known(threshold)) =
                    (status.remaining, status.threshold)
                else {
                    return None;
                };
                Some(Warning {
                    container_id: container_id.clone(),
                    container_name: container.name.clone(),
                    position,
                    name: sample.name.clone(),
                    vendor: sample.vendor.clone(),
                    remaining,
                    unit: sample.amount_unit.clone(),
                    threshold,
                })
            })
        })
        .sorted_by(|a, b| a.remaining.total_cmp(&b.remaining))
        .collect::<Vec<_>>();

    log::debug!("{} low-stock warning(s)", warnings.len());
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Container, Sample};

    fn stocked(name: &str, total: &str, per_use: &str, uses: u32, threshold: &str) -> Sample {
        Sample {
            total_amount: total.to_string(),
            amount_per_use: per_use.to_string(),
            uses_consumed: uses,
            warn_threshold: threshold.to_string(),
            amount_unit: AmountUnit::Microliter,
            ..Sample::named(name)
        }
    }

    fn database(samples: Vec<(Position, Sample)>) -> Database {
        let mut container = Container::new("Freezer".to_string(), 5, 5);
        container.slots.extend(samples);
        let mut db = Database::new();
        db.containers.insert("box_1".to_string(), container);
        db
    }

    #[test]
    fn test_samples_without_threshold_are_never_listed() {
        let db = database(vec![(Position::new(1, 1), stocked("Empty", "10", "10", 5, ""))]);
        assert!(list_warnings(&db).is_empty());
    }

    #[test]
    fn test_unknown_total_is_never_listed() {
        let db = database(vec![(Position::new(1, 1), stocked("Unknown", "", "1", 5, "100"))]);
        assert!(list_warnings(&db).is_empty());
    }

    #[test]
    fn test_sorted_ascending_by_remaining() {
        let db = database(vec![
            (Position::new(1, 1), stocked("A", "10", "1", 2, "9")),
            (Position::new(1, 2), stocked("B", "10", "1", 9, "5")),
            (Position::new(1, 3), stocked("C", "10", "1", 5, "5")),
            (Position::new(1, 4), stocked("D", "10", "1", 0, "5")),
            (Position::new(1, 5), stocked("E", "10", "1", 9, "1")),
        ]);
        let warnings = list_warnings(&db);
        let names: Vec<_> = warnings.iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, vec!["B", "E", "C", "A"]);
        assert!(warnings
            .windows(2)
            .all(|pair| pair[0].remaining <= pair[1].remaining));
        assert_eq!(warnings[0].threshold, 5.0);
        assert_eq!(warnings[0].unit, AmountUnit::Microliter);
    }

    #[test]
    fn test_threshold_boundary_is_inclusive() {
        let db = database(vec![(Position::new(2, 2), stocked("Edge", "10", "2", 3, "4"))]);
        let warnings = list_warnings(&db);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].remaining, 4.0);
        assert_eq!(warnings[0].position, Position::new(2, 2));
        assert_eq!(warnings[0].container_name, "Freezer");
    }
}
