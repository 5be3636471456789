//! Projection UTM (Universal Transverse Mercator)
//!
//! Formules en série (Snyder, USGS PP 1395), paramétrées par l'ellipsoïde.
//! Valides pour |lat| <= 84°.

use super::Geographic;
use crate::registry::{Ellipsoid, Hemisphere, UtmZone};
use crate::GeodesyError;

/// Facteur d'échelle sur le méridien central
const K0: f64 = 0.9996;

/// Faux est
const FALSE_EASTING: f64 = 500000.0;

/// Latitude maximale du domaine UTM, en degrés
pub const MAX_LATITUDE: f64 = 84.0;

/// Vérifie qu'une latitude (radians) est dans le domaine UTM
pub(crate) fn check_latitude(lat: f64) -> Result<(), GeodesyError> {
    if !lat.is_finite() {
        return Err(GeodesyError::domain("latitude is not finite"));
    }
    let deg = lat.to_degrees();
    if deg.abs() > MAX_LATITUDE {
        return Err(GeodesyError::domain(format!(
            "latitude {:.6}° outside UTM range ±{}°",
            deg, MAX_LATITUDE
        )));
    }
    Ok(())
}

/// Longueur d'arc de méridien depuis l'équateur
fn meridian_arc(lat: f64, a: f64, e2: f64) -> f64 {
    let e4 = e2 * e2;
    let e6 = e4 * e2;

    a * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * lat
        - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * lat).sin()
        + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * lat).sin()
        - (35.0 * e6 / 3072.0) * (6.0 * lat).sin())
}

/// Convertit UTM vers coordonnées géographiques sur le même ellipsoïde
pub fn utm_to_geographic(
    x: f64,
    y: f64,
    zone: UtmZone,
    hemisphere: Hemisphere,
    ellipsoid: &Ellipsoid,
) -> Result<Geographic, GeodesyError> {
    if !x.is_finite() || !y.is_finite() {
        return Err(GeodesyError::domain(format!(
            "non-finite UTM coordinate ({}, {})",
            x, y
        )));
    }

    let a = ellipsoid.a;
    let e2 = ellipsoid.e2();
    let ep2 = ellipsoid.ep2();

    let lon0 = zone.central_meridian().to_radians();

    // Coordonnées réduites
    let x = x - FALSE_EASTING;
    let y = y - hemisphere.false_northing();

    // Calcul du footprint latitude
    let m = y / K0;
    let mu = m / (a * (1.0 - e2 / 4.0 - 3.0 * e2.powi(2) / 64.0 - 5.0 * e2.powi(3) / 256.0));

    // Coefficients pour la série
    let e1 = (1.0 - (1.0 - e2).sqrt()) / (1.0 + (1.0 - e2).sqrt());

    let phi1 = mu
        + (3.0 * e1 / 2.0 - 27.0 * e1.powi(3) / 32.0) * (2.0 * mu).sin()
        + (21.0 * e1.powi(2) / 16.0 - 55.0 * e1.powi(4) / 32.0) * (4.0 * mu).sin()
        + (151.0 * e1.powi(3) / 96.0) * (6.0 * mu).sin()
        + (1097.0 * e1.powi(4) / 512.0) * (8.0 * mu).sin();

    // Seul le pôle rend la série inutilisable ; le domaine porte sur la latitude finale
    if !phi1.is_finite() || phi1.abs() >= std::f64::consts::FRAC_PI_2 {
        return Err(GeodesyError::domain("footprint latitude beyond the pole"));
    }

    let sin_phi1 = phi1.sin();
    let cos_phi1 = phi1.cos();
    let tan_phi1 = phi1.tan();

    let n1 = a / (1.0 - e2 * sin_phi1.powi(2)).sqrt();
    let t1 = tan_phi1.powi(2);
    let c1 = ep2 * cos_phi1.powi(2);
    let r1 = a * (1.0 - e2) / (1.0 - e2 * sin_phi1.powi(2)).powf(1.5);
    let d = x / (n1 * K0);

    let lat = phi1
        - (n1 * tan_phi1 / r1)
            * (d.powi(2) / 2.0
                - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1.powi(2) - 9.0 * ep2) * d.powi(4) / 24.0
                + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1.powi(2) - 252.0 * ep2 - 3.0 * c1.powi(2))
                    * d.powi(6)
                    / 720.0);

    let lon = lon0
        + (d - (1.0 + 2.0 * t1 + c1) * d.powi(3) / 6.0
            + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1.powi(2) + 8.0 * ep2 + 24.0 * t1.powi(2))
                * d.powi(5)
                / 120.0)
            / cos_phi1;

    check_latitude(lat)?;
    if !lon.is_finite() {
        return Err(GeodesyError::domain("longitude is not finite"));
    }

    Ok(Geographic::new(lon, lat))
}

/// Convertit des coordonnées géographiques vers UTM sur le même ellipsoïde
///
/// La zone est imposée par l'appelant : aucune zone "naturelle" n'est recalculée.
pub fn geographic_to_utm(
    geo: Geographic,
    zone: UtmZone,
    hemisphere: Hemisphere,
    ellipsoid: &Ellipsoid,
) -> Result<(f64, f64), GeodesyError> {
    check_latitude(geo.lat)?;
    if !geo.lon.is_finite() {
        return Err(GeodesyError::domain("longitude is not finite"));
    }

    let a = ellipsoid.a;
    let e2 = ellipsoid.e2();
    let ep2 = ellipsoid.ep2();

    let lat = geo.lat;
    let lon0 = zone.central_meridian().to_radians();

    let sin_lat = lat.sin();
    let cos_lat = lat.cos();
    let tan_lat = lat.tan();

    let n = a / (1.0 - e2 * sin_lat.powi(2)).sqrt();
    let t = tan_lat.powi(2);
    let c = ep2 * cos_lat.powi(2);
    let aa = (geo.lon - lon0) * cos_lat;
    let m = meridian_arc(lat, a, e2);

    let x = K0
        * n
        * (aa
            + (1.0 - t + c) * aa.powi(3) / 6.0
            + (5.0 - 18.0 * t + t.powi(2) + 72.0 * c - 58.0 * ep2) * aa.powi(5) / 120.0);

    let y = K0
        * (m + n
            * tan_lat
            * (aa.powi(2) / 2.0
                + (5.0 - t + 9.0 * c + 4.0 * c.powi(2)) * aa.powi(4) / 24.0
                + (61.0 - 58.0 * t + t.powi(2) + 600.0 * c - 330.0 * ep2) * aa.powi(6) / 720.0));

    Ok((x + FALSE_EASTING, y + hemisphere.false_northing()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(n: u32) -> UtmZone {
        UtmZone::new(n).unwrap()
    }

    #[test]
    fn test_martinique() {
        // Fort-de-France approximativement
        // UTM Zone 20N: 708000, 1615000
        let geo =
            utm_to_geographic(708000.0, 1615000.0, zone(20), Hemisphere::North, &Ellipsoid::WGS84)
                .unwrap();
        let (lon, lat) = geo.to_degrees();

        // Fort-de-France: -61.07°E, 14.60°N
        assert!((lon - (-61.07)).abs() < 0.2, "lon={}", lon);
        assert!((lat - 14.60).abs() < 0.2, "lat={}", lat);
    }

    #[test]
    fn test_reunion_south() {
        // Saint-Denis approximativement
        // UTM Zone 40S: 338000, 7691000
        let geo =
            utm_to_geographic(338000.0, 7691000.0, zone(40), Hemisphere::South, &Ellipsoid::WGS84)
                .unwrap();
        let (lon, lat) = geo.to_degrees();

        assert!((lon - 55.45).abs() < 0.2, "lon={}", lon);
        assert!((lat - (-20.88)).abs() < 0.2, "lat={}", lat);
    }

    #[test]
    fn test_central_meridian_on_false_easting() {
        let geo =
            utm_to_geographic(500000.0, 3500000.0, zone(31), Hemisphere::North, &Ellipsoid::WGS84)
                .unwrap();
        let (lon, _) = geo.to_degrees();
        assert!((lon - 3.0).abs() < 1e-12, "lon={}", lon);
    }

    #[test]
    fn test_forward_known_point() {
        // Alger (36.7538°N, 3.0588°E), zone 31N
        let geo = Geographic::from_degrees(3.0588, 36.7538);
        let (x, y) = geographic_to_utm(geo, zone(31), Hemisphere::North, &Ellipsoid::WGS84).unwrap();
        assert!((x - 505_260.0).abs() < 50.0, "x={}", x);
        assert!((y - 4_067_600.0).abs() < 200.0, "y={}", y);
    }

    #[test]
    fn test_roundtrip_both_ellipsoids() {
        for ellipsoid in [Ellipsoid::WGS84, Ellipsoid::CLARKE_1880_RGS] {
            for (lon, lat) in [(1.3, 28.4), (4.9, 33.1), (3.0, 0.5), (2.2, 22.0)] {
                let geo = Geographic::from_degrees(lon, lat);
                let (x, y) = geographic_to_utm(geo, zone(31), Hemisphere::North, &ellipsoid).unwrap();
                let back = utm_to_geographic(x, y, zone(31), Hemisphere::North, &ellipsoid).unwrap();
                let (lon2, lat2) = back.to_degrees();
                assert!((lon2 - lon).abs() < 1e-7, "{}: lon {} vs {}", ellipsoid.name, lon2, lon);
                assert!((lat2 - lat).abs() < 1e-7, "{}: lat {} vs {}", ellipsoid.name, lat2, lat);
            }
        }
    }

    #[test]
    fn test_polar_is_out_of_domain() {
        let err = utm_to_geographic(500000.0, 9_500_000.0, zone(31), Hemisphere::North, &Ellipsoid::WGS84)
            .unwrap_err();
        assert!(matches!(err, GeodesyError::ProjectionDomain { .. }));

        let geo = Geographic::from_degrees(3.0, 85.0);
        assert!(geographic_to_utm(geo, zone(31), Hemisphere::North, &Ellipsoid::WGS84).is_err());
    }

    #[test]
    fn test_latitude_limit_off_meridian() {
        // Footprint au-delà de 84°, latitude réelle en deçà
        for lon in [6.0, 9.0] {
            let geo = Geographic::from_degrees(lon, 83.99);
            let (x, y) = geographic_to_utm(geo, zone(31), Hemisphere::North, &Ellipsoid::WGS84).unwrap();
            let back = utm_to_geographic(x, y, zone(31), Hemisphere::North, &Ellipsoid::WGS84).unwrap();
            let (lon2, lat2) = back.to_degrees();
            assert!((lat2 - 83.99).abs() < 1e-5, "lat={}", lat2);
            assert!((lon2 - lon).abs() < 1e-4, "lon={}", lon2);
        }

        let geo = Geographic::from_degrees(3.0, 83.9999);
        assert!(geographic_to_utm(geo, zone(31), Hemisphere::North, &Ellipsoid::WGS84).is_ok());
    }

    #[test]
    fn test_non_finite_input() {
        assert!(utm_to_geographic(f64::NAN, 0.0, zone(31), Hemisphere::North, &Ellipsoid::WGS84).is_err());
    }
}
