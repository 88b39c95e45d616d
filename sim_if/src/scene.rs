//! # Scene records
//!
//! The simulator loads a road from a newline-delimited JSON file in which every line is one
//! scene object. A road is described by three objects: the drivable lane surface (a decal road),
//! the physical mesh road underneath it, and the goal waypoint at the end of the lane.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// The scene group all road objects are placed in.
pub const ROADS_GROUP: &str = "Roads";

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// The drivable road surface.
///
/// Nodes are `[x, y, z, width]`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DecalRoad {
    #[serde(rename = "persistentId")]
    pub persistent_id: String,

    #[serde(rename = "__parent")]
    pub parent: String,

    pub position: [f64; 3],

    #[serde(rename = "Material")]
    pub material: String,

    pub drivability: f64,

    #[serde(rename = "improvedSpline")]
    pub improved_spline: bool,

    pub nodes: Vec<[f64; 4]>,

    pub order_simset: u32,

    #[serde(rename = "overObjects")]
    pub over_objects: bool,
}

/// The mesh road body the decal is drawn over.
///
/// Nodes are `[x, y, z, width, depth, normal_x, normal_y, normal_z]`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MeshRoad {
    pub name: String,

    #[serde(rename = "persistentId")]
    pub persistent_id: String,

    #[serde(rename = "__parent")]
    pub parent: String,

    #[serde(rename = "bottomMaterial")]
    pub bottom_material: String,

    pub nodes: Vec<[f64; 8]>,

    pub order_simset: u32,

    #[serde(rename = "sideMaterial")]
    pub side_material: String,

    #[serde(rename = "topMaterial")]
    pub top_material: String,
}

/// The waypoint the vehicle AI drives towards.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Waypoint {
    pub name: String,

    #[serde(rename = "persistentId")]
    pub persistent_id: String,

    #[serde(rename = "__parent")]
    pub parent: String,

    pub position: [f64; 3],

    pub scale: [f64; 3],
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// A single line of the scene file.
///
/// The object class is written into the `class` field of the record.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "class")]
pub enum SceneRecord {
    DecalRoad(DecalRoad),
    MeshRoad(MeshRoad),
    #[serde(rename = "BeamNGWaypoint")]
    Waypoint(Waypoint),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SceneRecord {
    /// The unique identifier of the scene object.
    pub fn persistent_id(&self) -> &str {
        match self {
            SceneRecord::DecalRoad(r) => &r.persistent_id,
            SceneRecord::MeshRoad(r) => &r.persistent_id,
            SceneRecord::Waypoint(w) => &w.persistent_id,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_waypoint_class_tag() {
        let rec = SceneRecord::Waypoint(Waypoint {
            name: String::from("GoalWaypoint"),
            persistent_id: String::from("abc"),
            parent: String::from(ROADS_GROUP),
            position: [1.0, 2.0, 3.0],
            scale: [8.0; 3],
        });

        let value = serde_json::to_value(&rec).unwrap();
        assert_eq!(value["class"], "BeamNGWaypoint");
        assert_eq!(value["__parent"], "Roads");
        assert_eq!(value["persistentId"], "abc");
        assert_eq!(rec.persistent_id(), "abc");
    }
}
