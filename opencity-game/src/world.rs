//! District and location topology.
//!
//! The graph is built once when a session starts and never changes during
//! play, so sessions share it behind an `Arc`.
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::GameError;

/// A city district. Its danger feeds the encounter roll on arrival.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct District {
    pub id: String,
    pub display_name: String,
    /// Danger rating (0-100)
    pub danger: u8,
}

impl District {
    #[must_use]
    pub fn new(id: &str, display_name: &str, danger: u8) -> Self {
        Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
            danger: danger.min(100),
        }
    }
}

/// A node the player can stand on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationNode {
    pub id: String,
    pub display_name: String,
    pub district_id: String,
    neighbors: Vec<String>,
    #[serde(default)]
    pub has_garage: bool,
    #[serde(default)]
    pub has_shop: bool,
    #[serde(default)]
    pub has_bank: bool,
}

impl LocationNode {
    #[must_use]
    pub fn new(id: &str, display_name: &str, district_id: &str) -> Self {
        Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
            district_id: district_id.to_string(),
            neighbors: Vec::new(),
            has_garage: false,
            has_shop: false,
            has_bank: false,
        }
    }

    #[must_use]
    pub const fn with_garage(mut self) -> Self {
        self.has_garage = true;
        self
    }

    #[must_use]
    pub const fn with_shop(mut self) -> Self {
        self.has_shop = true;
        self
    }

    #[must_use]
    pub const fn with_bank(mut self) -> Self {
        self.has_bank = true;
        self
    }

    /// Adjacent location ids in link order.
    #[must_use]
    pub fn neighbors(&self) -> &[String] {
        &self.neighbors
    }

    #[must_use]
    pub fn is_adjacent_to(&self, other: &str) -> bool {
        self.neighbors.iter().any(|id| id == other)
    }

    fn push_neighbor(&mut self, other: &str) {
        if !self.is_adjacent_to(other) {
            self.neighbors.push(other.to_string());
        }
    }
}

/// Static location graph with symmetric, de-duplicated adjacency.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorldGraph {
    districts: Vec<District>,
    locations: Vec<LocationNode>,
    district_index: HashMap<String, usize>,
    location_index: HashMap<String, usize>,
}

impl WorldGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a district.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Duplicate` if the id is already registered.
    pub fn add_district(&mut self, district: District) -> Result<(), GameError> {
        if self.district_index.contains_key(&district.id) {
            return Err(GameError::Duplicate {
                kind: "district",
                id: district.id,
            });
        }
        self.district_index
            .insert(district.id.clone(), self.districts.len());
        self.districts.push(district);
        Ok(())
    }

    /// Register a location inside an existing district. Any neighbors carried
    /// by the node are discarded; adjacency is only created through [`Self::link`].
    ///
    /// # Errors
    ///
    /// Returns `GameError::NotFound` for an unknown district and
    /// `GameError::Duplicate` for a repeated location id.
    pub fn add_location(&mut self, mut location: LocationNode) -> Result<(), GameError> {
        if !self.district_index.contains_key(&location.district_id) {
            return Err(GameError::not_found("district", &location.district_id));
        }
        if self.location_index.contains_key(&location.id) {
            return Err(GameError::Duplicate {
                kind: "location",
                id: location.id,
            });
        }
        location.neighbors.clear();
        self.location_index
            .insert(location.id.clone(), self.locations.len());
        self.locations.push(location);
        Ok(())
    }

    /// Connect two locations in both directions. Linking an existing pair
    /// again leaves the adjacency unchanged.
    ///
    /// # Errors
    ///
    /// Returns `GameError::NotFound` for unknown ids and
    /// `GameError::InvalidTarget` when `a == b`.
    pub fn link(&mut self, a: &str, b: &str) -> Result<(), GameError> {
        let ia = self.index_of(a)?;
        let ib = self.index_of(b)?;
        if ia == ib {
            return Err(GameError::invalid_target(a, b));
        }
        if let Some(node) = self.locations.get_mut(ia) {
            node.push_neighbor(b);
        }
        if let Some(node) = self.locations.get_mut(ib) {
            node.push_neighbor(a);
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `GameError::NotFound` for an unknown location id.
    pub fn neighbors_of(&self, location_id: &str) -> Result<&[String], GameError> {
        self.location(location_id).map(LocationNode::neighbors)
    }

    /// # Errors
    ///
    /// Returns `GameError::NotFound` for an unknown location id or a
    /// location whose district is missing.
    pub fn district_of(&self, location_id: &str) -> Result<&District, GameError> {
        let location = self.location(location_id)?;
        self.district(&location.district_id)
    }

    /// # Errors
    ///
    /// Returns `GameError::NotFound` for an unknown location id.
    pub fn location(&self, location_id: &str) -> Result<&LocationNode, GameError> {
        let idx = self.index_of(location_id)?;
        self.locations
            .get(idx)
            .ok_or_else(|| GameError::not_found("location", location_id))
    }

    /// # Errors
    ///
    /// Returns `GameError::NotFound` for an unknown district id.
    pub fn district(&self, district_id: &str) -> Result<&District, GameError> {
        self.district_index
            .get(district_id)
            .and_then(|idx| self.districts.get(*idx))
            .ok_or_else(|| GameError::not_found("district", district_id))
    }

    #[must_use]
    pub fn contains(&self, location_id: &str) -> bool {
        self.location_index.contains_key(location_id)
    }

    /// All location ids in registration order.
    #[must_use]
    pub fn location_ids(&self) -> Vec<String> {
        self.locations.iter().map(|l| l.id.clone()).collect()
    }

    #[must_use]
    pub fn locations(&self) -> &[LocationNode] {
        &self.locations
    }

    #[must_use]
    pub fn districts(&self) -> &[District] {
        &self.districts
    }

    /// Display name for a location, falling back to the raw id.
    #[must_use]
    pub fn name_of<'a>(&'a self, location_id: &'a str) -> &'a str {
        self.location(location_id)
            .map_or(location_id, |l| l.display_name.as_str())
    }

    fn index_of(&self, location_id: &str) -> Result<usize, GameError> {
        self.location_index
            .get(location_id)
            .copied()
            .ok_or_else(|| GameError::not_found("location", location_id))
    }

    /// The fixed city every session starts in.
    #[must_use]
    pub fn default_city() -> Self {
        Self::build_default_city().unwrap_or_else(|err| {
            log::warn!("default city failed to build, starting empty: {err}");
            Self::default()
        })
    }

    fn build_default_city() -> Result<Self, GameError> {
        let mut world = Self::new();
        for district in [
            District::new("downtown", "Downtown", 35),
            District::new("harbor", "Harbor", 55),
            District::new("suburbs", "Suburbs", 15),
        ] {
            world.add_district(district)?;
        }
        for location in [
            LocationNode::new("dt_square", "City Square", "downtown").with_shop(),
            LocationNode::new("bank_dt", "Central Bank", "downtown").with_bank(),
            LocationNode::new("harbor_pier", "Pier 3", "harbor"),
            LocationNode::new("garage_sb", "Suburb Garage", "suburbs").with_garage(),
        ] {
            world.add_location(location)?;
        }
        world.link("dt_square", "bank_dt")?;
        world.link("dt_square", "harbor_pier")?;
        world.link("dt_square", "garage_sb")?;
        Ok(world)
    }
}
