//! Representative coordinates for a region identifier.
//!
//! Lookup order: exact region (`Kerala_Kottayam`), then its state
//! (`Kerala`), then [`DEFAULT_COORDS`]. Matching ignores case and treats
//! spaces and underscores alike.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coords {
    pub lat: f64,
    pub lon: f64,
}

/// Geographic centre of India.
pub const DEFAULT_COORDS: Coords = Coords {
    lat: 20.5937,
    lon: 78.9629,
};

const DISTRICTS: &[(&str, f64, f64)] = &[
    ("kerala_kottayam", 9.5916, 76.5222),
    ("kerala_ernakulam", 9.9816, 76.2999),
    ("kerala_thrissur", 10.5276, 76.2144),
    ("kerala_palakkad", 10.7867, 76.6548),
    ("kerala_thiruvananthapuram", 8.5241, 76.9366),
    ("kerala_kozhikode", 11.2588, 75.7804),
    ("tamil_nadu_coimbatore", 11.0168, 76.9558),
    ("tamil_nadu_madurai", 9.9252, 78.1198),
    ("karnataka_mysuru", 12.2958, 76.6394),
    ("maharashtra_nashik", 19.9975, 73.7898),
    ("maharashtra_pune", 18.5204, 73.8567),
    ("punjab_ludhiana", 30.9010, 75.8573),
    ("uttar_pradesh_agra", 27.1767, 78.0081),
];

const STATES: &[(&str, f64, f64)] = &[
    ("andhra_pradesh", 15.9129, 79.7400),
    ("assam", 26.2006, 92.9376),
    ("bihar", 25.0961, 85.3131),
    ("gujarat", 22.2587, 71.1924),
    ("haryana", 29.0588, 76.0856),
    ("karnataka", 15.3173, 75.7139),
    ("kerala", 10.8505, 76.2711),
    ("madhya_pradesh", 22.9734, 78.6569),
    ("maharashtra", 19.7515, 75.7139),
    ("odisha", 20.9517, 85.0985),
    ("punjab", 31.1471, 75.3412),
    ("rajasthan", 27.0238, 74.2179),
    ("tamil_nadu", 11.1271, 78.6569),
    ("telangana", 18.1124, 79.0193),
    ("uttar_pradesh", 26.8467, 80.9462),
    ("west_bengal", 22.9868, 87.8550),
];

fn normalize(region: &str) -> String {
    region
        .trim()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c.to_ascii_lowercase() })
        .collect()
}

fn lookup(table: &[(&str, f64, f64)], key: &str) -> Option<Coords> {
    table
        .iter()
        .find(|(name, _, _)| *name == key)
        .map(|&(_, lat, lon)| Coords { lat, lon })
}

pub fn resolve_coords_for_state(region: &str) -> Coords {
    let key = normalize(region);

    if let Some(coords) = lookup(DISTRICTS, &key) {
        return coords;
    }

    // Longest state prefix wins so "tamil_nadu_x" beats a shorter match.
    STATES
        .iter()
        .filter(|(state, _, _)| {
            key == *state
                || key
                    .strip_prefix(*state)
                    .is_some_and(|rest| rest.starts_with('_'))
        })
        .max_by_key(|(state, _, _)| state.len())
        .map(|&(_, lat, lon)| Coords { lat, lon })
        .unwrap_or(DEFAULT_COORDS)
}
