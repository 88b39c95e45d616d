//! # Scene emitter
//!
//! Writes a road into the simulator's scene file: the decal road the agent drives on, the mesh
//! road beneath it and the goal waypoint, one JSON object per line.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::{
    collections::hash_map::DefaultHasher,
    fs::{self, File},
    hash::{Hash, Hasher},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    sync::atomic::{AtomicU64, Ordering},
};

use chrono::Utc;
use log::info;
use sim_if::scene::{DecalRoad, MeshRoad, SceneRecord, Waypoint, ROADS_GROUP};

use crate::road::Road;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Width of the hard shoulder added to each side of the mesh road.
///
/// Units: meters
pub const HARD_SHOULDER_WIDTH_M: f64 = 1.0;

/// Name the agent's AI is pointed at.
pub const GOAL_WAYPOINT_NAME: &str = "GoalWaypoint";

const MESH_ROAD_NAME: &str = "NewMeshRoad";
const DECAL_MATERIAL: &str = "tig_road_rubber_sticky";
const MESH_MATERIAL: &str = "track_editor_grid";

static ID_COUNTER: AtomicU64 = AtomicU64::new(0);

// ------------------------------------------------------------------------------------------------
// ENUMERATIONS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("Cannot write the scene file {0:?}: {1}")]
    FileError(PathBuf, std::io::Error),
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// The three scene records describing a road.
pub fn scene_records(road: &Road) -> [SceneRecord; 3] {
    let width_m = road.width_m();
    let mesh_width_m = width_m + 2.0 * HARD_SHOULDER_WIDTH_M;

    let decal = DecalRoad {
        persistent_id: persistent_id(road.name(), "decal"),
        parent: String::from(ROADS_GROUP),
        position: [0.0; 3],
        material: String::from(DECAL_MATERIAL),
        drivability: 1.0,
        improved_spline: true,
        nodes: road.points().iter().map(|p| [p.x, p.y, p.z, width_m]).collect(),
        order_simset: 7,
        over_objects: true,
    };

    // The mesh depth matches the point's height so the mesh reaches the ground
    let mesh = MeshRoad {
        name: String::from(MESH_ROAD_NAME),
        persistent_id: persistent_id(road.name(), "mesh"),
        parent: String::from(ROADS_GROUP),
        bottom_material: String::from(MESH_MATERIAL),
        nodes: road
            .points()
            .iter()
            .map(|p| [p.x, p.y, p.z, mesh_width_m, p.z, 0.0, 0.0, 1.0])
            .collect(),
        order_simset: 8,
        side_material: String::from(MESH_MATERIAL),
        top_material: String::from(MESH_MATERIAL),
    };

    let goal = road.goal_m();
    let waypoint = Waypoint {
        name: String::from(GOAL_WAYPOINT_NAME),
        persistent_id: persistent_id(road.name(), "waypoint"),
        parent: String::from(ROADS_GROUP),
        position: [goal.x, goal.y, goal.z],
        scale: [width_m; 3],
    };

    [
        SceneRecord::DecalRoad(decal),
        SceneRecord::MeshRoad(mesh),
        SceneRecord::Waypoint(waypoint),
    ]
}

/// Write the scene records of a road, one JSON object per line.
pub fn write_scene<W: Write>(road: &Road, mut writer: W) -> Result<(), std::io::Error> {
    for rec in scene_records(road).iter() {
        serde_json::to_writer(&mut writer, rec)?;
        writer.write_all(b"\n")?;
    }

    writer.flush()
}

/// Write the scene file of a road, replacing any existing file.
pub fn write_scene_file<P: AsRef<Path>>(road: &Road, path: P) -> Result<(), SceneError> {
    let path = path.as_ref();
    let err = |e| SceneError::FileError(path.to_path_buf(), e);

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(err)?;
    }

    let file = File::create(path).map_err(err)?;
    write_scene(road, BufWriter::new(file)).map_err(err)?;

    info!("Road \"{}\" written to {:?}", road.name(), path);

    Ok(())
}

/// A new identifier in the UUID text format.
fn persistent_id(road_name: &str, kind: &str) -> String {
    let now = Utc::now();
    let count = ID_COUNTER.fetch_add(1, Ordering::Relaxed);

    let hash = |salt: u8| {
        let mut hasher = DefaultHasher::new();
        salt.hash(&mut hasher);
        road_name.hash(&mut hasher);
        kind.hash(&mut hasher);
        now.timestamp().hash(&mut hasher);
        now.timestamp_subsec_nanos().hash(&mut hasher);
        count.hash(&mut hasher);
        hasher.finish()
    };

    let (hi, lo) = (hash(0), hash(1));

    format!(
        "{:08x}-{:04x}-{:04x}-{:04x}-{:012x}",
        hi >> 32,
        (hi >> 16) & 0xffff,
        hi & 0xffff,
        lo >> 48,
        lo & 0xffff_ffff_ffff
    )
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::road::Centerline;
    use nalgebra::Vector3;

    fn road() -> Road {
        let line = Centerline::new(vec![
            Vector3::new(0.0, 0.0, 1.0),
            Vector3::new(50.0, 0.0, 2.0),
            Vector3::new(100.0, 0.0, 3.0),
        ])
        .unwrap();
        Road::new("scene road", line, 8.0).unwrap()
    }

    #[test]
    fn test_write_scene() {
        let mut buf: Vec<u8> = Vec::new();
        write_scene(&road(), &mut buf).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);

        let decal: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(decal["class"], "DecalRoad");
        assert_eq!(decal["__parent"], "Roads");
        assert_eq!(decal["nodes"][1], serde_json::json!([50.0, 0.0, 2.0, 8.0]));

        let mesh: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(mesh["class"], "MeshRoad");
        assert_eq!(
            mesh["nodes"][2],
            serde_json::json!([100.0, 0.0, 3.0, 10.0, 3.0, 0.0, 0.0, 1.0])
        );

        let waypoint: SceneRecord = serde_json::from_str(lines[2]).unwrap();
        match waypoint {
            SceneRecord::Waypoint(w) => {
                assert_eq!(w.name, GOAL_WAYPOINT_NAME);
                assert_eq!(w.position, [100.0, -2.0, 3.0]);
                assert_eq!(w.scale, [8.0; 3]);
            }
            r => panic!("expected a waypoint, got {:?}", r),
        }
    }

    #[test]
    fn test_ids_unique() {
        let recs = scene_records(&road());
        let more = scene_records(&road());

        let ids: std::collections::HashSet<&str> = recs
            .iter()
            .chain(more.iter())
            .map(|r| r.persistent_id())
            .collect();
        assert_eq!(ids.len(), 6);

        let id = recs[0].persistent_id();
        assert_eq!(id.len(), 36);
        assert_eq!(id.matches('-').count(), 4);
    }
}
