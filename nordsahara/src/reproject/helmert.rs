//! Transformation de Helmert à 7 paramètres (changement de datum)
//!
//! Géographique → géocentrique (h = 0) sur l'ellipsoïde source,
//! similitude "position vector", puis géocentrique → géographique sur WGS84.

use super::Geographic;
use crate::registry::{Ellipsoid, HelmertParams};

/// Secondes d'arc → radians
const ARCSEC_TO_RAD: f64 = std::f64::consts::PI / (180.0 * 3600.0);

/// Coordonnées géocentriques cartésiennes (mètres)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geocentric {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Géographique (+ hauteur ellipsoïdale) → géocentrique
pub fn geodetic_to_geocentric(geo: Geographic, h: f64, ellipsoid: &Ellipsoid) -> Geocentric {
    let e2 = ellipsoid.e2();
    let (sin_lat, cos_lat) = geo.lat.sin_cos();
    let (sin_lon, cos_lon) = geo.lon.sin_cos();

    // Grande normale
    let n = ellipsoid.a / (1.0 - e2 * sin_lat * sin_lat).sqrt();

    Geocentric {
        x: (n + h) * cos_lat * cos_lon,
        y: (n + h) * cos_lat * sin_lon,
        z: (n * (1.0 - e2) + h) * sin_lat,
    }
}

/// Géocentrique → géographique (itératif), retourne aussi la hauteur ellipsoïdale
pub fn geocentric_to_geodetic(p: Geocentric, ellipsoid: &Ellipsoid) -> (Geographic, f64) {
    let a = ellipsoid.a;
    let e2 = ellipsoid.e2();

    let lon = p.y.atan2(p.x);
    let rho = p.x.hypot(p.y);

    if rho < 1e-9 {
        // Sur l'axe des pôles
        let lat = std::f64::consts::FRAC_PI_2.copysign(p.z);
        return (Geographic::new(lon, lat), p.z.abs() - ellipsoid.b());
    }

    let mut lat = p.z.atan2(rho * (1.0 - e2));
    let mut h = 0.0;

    for _ in 0..20 {
        let sin_lat = lat.sin();
        let n = a / (1.0 - e2 * sin_lat * sin_lat).sqrt();
        h = rho / lat.cos() - n;
        let new_lat = p.z.atan2(rho * (1.0 - e2 * n / (n + h)));

        if (new_lat - lat).abs() < 1e-14 {
            lat = new_lat;
            break;
        }
        lat = new_lat;
    }

    (Geographic::new(lon, lat), h)
}

/// Applique la similitude à 7 paramètres (convention position vector)
pub fn apply(params: &HelmertParams, p: Geocentric) -> Geocentric {
    let rx = params.rx * ARCSEC_TO_RAD;
    let ry = params.ry * ARCSEC_TO_RAD;
    let rz = params.rz * ARCSEC_TO_RAD;
    let m = 1.0 + params.scale_ppm * 1e-6;

    Geocentric {
        x: params.tx + m * (p.x - rz * p.y + ry * p.z),
        y: params.ty + m * (rz * p.x + p.y - rx * p.z),
        z: params.tz + m * (-ry * p.x + rx * p.y + p.z),
    }
}

/// Déplace une position géographique du datum source vers WGS84
pub fn shift_to_wgs84(geo: Geographic, ellipsoid: &Ellipsoid, params: &HelmertParams) -> Geographic {
    if params.is_identity() && *ellipsoid == Ellipsoid::WGS84 {
        return geo;
    }

    let source = geodetic_to_geocentric(geo, 0.0, ellipsoid);
    let shifted = apply(params, source);
    let (result, _) = geocentric_to_geodetic(shifted, &Ellipsoid::WGS84);
    result
}
