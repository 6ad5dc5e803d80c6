use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::{Container, Id};

/// Root aggregate: every container, keyed by id.
///
/// Containers iterate in id order, which for generated ids is creation order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Database {
    #[serde(alias = "boxes")]
    pub containers: BTreeMap<Id, Container>,
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn container(&self, id: &str) -> Option<&Container> {
        self.containers.get(id)
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }

    pub fn sample_count(&self) -> usize {
        self.containers.values().map(Container::occupied_count).sum()
    }

    /// Run the legacy migration over every container and drop containers
    /// that still have no usable grid. Returns whether anything changed.
    pub fn normalize(&mut self) -> bool {
        let mut changed = false;
        for container in self.containers.values_mut() {
            changed |= container.normalize_legacy();
        }

        let before = self.containers.len();
        self.containers.retain(|id, container| {
            if !container.has_valid_grid() {
                log::warn!(
                    "Dropping container '{}' ({}) with no usable grid ({}x{})",
                    container.name,
                    id,
                    container.rows,
                    container.cols
                );
            }
            container.has_valid_grid()
        });
        changed | (self.containers.len() != before)
    }

    /// Ids of containers whose grid has no positions
    pub fn containers_without_grid(&self) -> Vec<&Id> {
        self.containers
            .iter()
            .filter(|(_, container)| !container.has_valid_grid())
            .map(|(id, _)| id)
            .collect()
    }
}
