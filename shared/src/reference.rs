//! Built-in reference tables for Sindh
//!
//! District spellings differ between the boundary file, the forecast
//! locations and the FAO yield sheet. Locations and yields here are keyed by
//! canonical name; [`sindh_district_aliases`] maps every known spelling onto it.

use rust_decimal::Decimal;

use crate::models::{DistrictAliases, DistrictLocations, YieldTable};
use crate::types::{Crop, GpsCoordinates};

/// Default map centre (lat, lon) and zoom for the Sindh view
pub const SINDH_MAP_CENTER: (f64, f64) = (25.5, 68.5);
pub const SINDH_MAP_ZOOM: u8 = 6;

/// Raw → canonical district names
pub fn sindh_district_aliases() -> DistrictAliases {
    DistrictAliases::from_pairs([
        ("Nawabshah", "Shaheed Benazirabad"),
        ("Shaheed Benazir Abad", "Shaheed Benazirabad"),
        ("Thatta", "Thatta"),
        ("Jacobabad", "Jacobabad"),
        ("Sukkur", "Sukkur"),
        ("Larkana", "Larkana"),
        ("Badin", "Badin"),
        ("Mirpurkhas", "Mirpur Khas"),
        ("Hyderabad", "Hyderabad"),
        ("Karachi", "Karachi"),
        ("Shikarpur", "Shikarpur"),
        ("Kashmore", "Kashmore"),
        ("Umerkot", "Umarkot"),
        ("Sanghar", "Sanghar"),
    ])
}

/// Forecast coordinates per canonical district
pub fn sindh_district_locations() -> DistrictLocations {
    let table: [(&str, i64, i64); 13] = [
        ("Karachi", 248607, 670011),
        ("Hyderabad", 253960, 683578),
        ("Sukkur", 277139, 688356),
        ("Larkana", 275600, 682264),
        ("Thatta", 247466, 679235),
        ("Shaheed Benazirabad", 262483, 684096),
        ("Mirpur Khas", 255251, 690159),
        ("Badin", 246550, 688370),
        ("Jacobabad", 282819, 684370),
        ("Shikarpur", 279556, 686382),
        ("Kashmore", 284329, 695814),
        ("Umarkot", 253610, 697360),
        ("Sanghar", 260469, 689492),
    ];

    let mut locations = DistrictLocations::new();
    for (name, lat, lon) in table {
        locations.insert(
            name,
            GpsCoordinates::new(Decimal::new(lat, 4), Decimal::new(lon, 4)),
        );
    }
    locations
}

/// FAO reference yields (t/ha) per canonical district
pub fn sindh_reference_yields() -> YieldTable {
    let table: [(Crop, &str, i64, u32); 13] = [
        (Crop::Wheat, "Thatta", 25, 1),
        (Crop::Wheat, "Shaheed Benazirabad", 30, 1),
        (Crop::Wheat, "Sukkur", 28, 1),
        (Crop::Rice, "Thatta", 35, 1),
        (Crop::Rice, "Badin", 30, 1),
        (Crop::Rice, "Larkana", 38, 1),
        (Crop::Cotton, "Mirpur Khas", 22, 1),
        (Crop::Cotton, "Hyderabad", 25, 1),
        (Crop::Cotton, "Shaheed Benazirabad", 23, 1),
        (Crop::Sugarcane, "Badin", 60, 0),
        (Crop::Sugarcane, "Thatta", 65, 0),
        (Crop::Sugarcane, "Sanghar", 70, 0),
        (Crop::Sugarcane, "Shaheed Benazirabad", 68, 0),
    ];

    let mut yields = YieldTable::new();
    for (crop, district, value, scale) in table {
        yields.insert(crop, district, Decimal::new(value, scale));
    }
    yields
}
