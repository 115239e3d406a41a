//! Built-in default collection, used when both remote and cache are empty.

use crate::types::{GeoPoint, Status, Territory, TerritoryId};

fn seed(
    name: &str,
    boundary: &[[f64; 2]],
    price: &str,
    status: Status,
    description: &str,
    floor_info: &str,
    developer: &str,
) -> Territory {
    Territory {
        id: TerritoryId::generate(),
        name: name.to_string(),
        boundary: boundary.iter().map(|&p| GeoPoint::from(p)).collect(),
        price: price.to_string(),
        status,
        description: description.to_string(),
        floor_info: floor_info.to_string(),
        developer: developer.to_string(),
    }
}

/// The three starter territories shipped with the app.
pub fn default_territories() -> Vec<Territory> {
    vec![
        seed(
            "Zlahoda",
            &[
                [50.4397, 30.6189],
                [50.4405, 30.6209],
                [50.4391, 30.6218],
                [50.4383, 30.6198],
            ],
            "from 45 000 UAH/m²",
            Status::Building,
            "Modern residential complex next to the metro",
            "25 floors",
            "Zlahoda Development",
        ),
        seed(
            "Zarichnyi",
            &[
                [50.462, 30.638],
                [50.463, 30.642],
                [50.460, 30.643],
                [50.459, 30.639],
            ],
            "from 6.98M UAH",
            Status::Building,
            "Riverside residential complex",
            "25 floors",
            "ABC Construction",
        ),
        seed(
            "Riverside",
            &[
                [50.455, 30.625],
                [50.456, 30.628],
                [50.454, 30.629],
                [50.453, 30.626],
            ],
            "from 5.2M UAH",
            Status::Ready,
            "Ready for occupancy",
            "16 floors",
            "XYZ Construction",
        ),
    ]
}
