//! Street geometry from Overpass API responses

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::collections::HashMap;

use log::{debug, trace};
use serde::Deserialize;

use super::MapError;

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// A `(longitude, latitude)` pair in degrees.
pub type LonLat = (f64, f64);

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
struct OverpassElement {
    #[serde(rename = "type")]
    kind: String,

    #[serde(default)]
    tags: HashMap<String, String>,

    #[serde(default)]
    geometry: Vec<OverpassNode>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct OverpassNode {
    lat: f64,
    lon: f64,
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Extract the geometry of a named street from an Overpass JSON response.
///
/// All ways carrying the street's name are merged where they meet end to end, and the longest
/// resulting line is returned.
pub fn street_lines(overpass_json: &str, street_name: &str) -> Result<Vec<LonLat>, MapError> {
    let response: OverpassResponse = serde_json::from_str(overpass_json)?;

    let ways: Vec<Vec<LonLat>> = response
        .elements
        .into_iter()
        .filter(|e| e.kind == "way")
        .filter(|e| e.tags.get("name").map(|n| n == street_name).unwrap_or(false))
        .map(|e| e.geometry.iter().map(|n| (n.lon, n.lat)).collect::<Vec<_>>())
        .filter(|g| g.len() >= 2)
        .collect();

    debug!("Found {} ways named \"{}\"", ways.len(), street_name);

    if ways.is_empty() {
        return Err(MapError::InvalidInput(format!(
            "no ways named \"{}\" in the response",
            street_name
        )));
    }

    let merged = merge_lines(ways);
    trace!("Merged into {} lines", merged.len());

    longest(merged).ok_or_else(|| MapError::InvalidInput(String::from("no merged lines")))
}

/// Join lines which share an end point into longer lines.
///
/// Lines are only joined at points where exactly two line ends meet, so junctions of three or
/// more ways are left as separate lines. Lines are reversed where needed to join them.
pub fn merge_lines(lines: Vec<Vec<LonLat>>) -> Vec<Vec<LonLat>> {
    // Number of line ends touching each point
    let mut end_counts: HashMap<(u64, u64), usize> = HashMap::new();
    for line in lines.iter() {
        for p in ends(line) {
            *end_counts.entry(key(p)).or_insert(0) += 1;
        }
    }
    let joinable = |p: &LonLat| end_counts.get(&key(p)).copied() == Some(2);

    let mut remaining: Vec<Option<Vec<LonLat>>> = lines.into_iter().map(Some).collect();
    let mut merged = Vec::new();

    for i in 0..remaining.len() {
        let mut current = match remaining[i].take() {
            Some(l) => l,
            None => continue,
        };

        loop {
            let head = current[0];
            let tail = current[current.len() - 1];

            if head == tail {
                break;
            }

            let mut joined = false;

            for slot in remaining.iter_mut() {
                let other = match slot {
                    Some(o) => o,
                    None => continue,
                };

                let o_head = other[0];
                let o_tail = other[other.len() - 1];

                if joinable(&tail) && o_head == tail {
                    current.extend_from_slice(&other[1..]);
                } else if joinable(&tail) && o_tail == tail {
                    current.extend(other.iter().rev().skip(1));
                } else if joinable(&head) && o_tail == head {
                    let mut l = other.clone();
                    l.extend_from_slice(&current[1..]);
                    current = l;
                } else if joinable(&head) && o_head == head {
                    let mut l: Vec<LonLat> = other.iter().rev().cloned().collect();
                    l.extend_from_slice(&current[1..]);
                    current = l;
                } else {
                    continue;
                }

                *slot = None;
                joined = true;
                break;
            }

            if !joined {
                break;
            }
        }

        merged.push(current);
    }

    merged
}

/// Pick the line with the greatest planar length.
pub fn longest(lines: Vec<Vec<LonLat>>) -> Option<Vec<LonLat>> {
    lines.into_iter().fold(None, |best, line| {
        let len = planar_length(&line);
        match best {
            Some((best_len, _)) if best_len >= len => best,
            _ => Some((len, line)),
        }
    })
    .map(|(_, line)| line)
}

fn planar_length(line: &[LonLat]) -> f64 {
    line.windows(2)
        .map(|w| (w[1].0 - w[0].0).hypot(w[1].1 - w[0].1))
        .sum()
}

fn ends(line: &[LonLat]) -> Vec<&LonLat> {
    match (line.first(), line.last()) {
        (Some(a), Some(b)) => vec![a, b],
        _ => vec![],
    }
}

fn key(p: &LonLat) -> (u64, u64) {
    (p.0.to_bits(), p.1.to_bits())
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
