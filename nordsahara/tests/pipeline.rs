//! Tests d'intégration : levé → conversion → surface → intersection → KML

use geo::Coord;
use nordsahara::export::{serialize, KmlStyle};
use nordsahara::geometry::{area, signed_area};
use nordsahara::{
    intersect, AreaUnit, BoundaryFeature, GeodesyError, MatchPolicy, Ring, SmartReprojector,
    Survey,
};

/// Parcelle de 4 ha près d'Ouargla, UTM 31 Nord Sahara
fn ouargla_parcel() -> Survey {
    Survey::from_raw([
        Coord { x: 720_000.0, y: 3_537_000.0 },
        Coord { x: 720_200.0, y: 3_537_000.0 },
        Coord { x: 720_200.0, y: 3_537_200.0 },
        Coord { x: 720_000.0, y: 3_537_200.0 },
    ])
}

fn boxed(name: &str, lon0: f64, lat0: f64, lon1: f64, lat1: f64) -> BoundaryFeature {
    BoundaryFeature::new(
        name,
        Ring::from(vec![(lon0, lat0), (lon1, lat0), (lon1, lat1), (lon0, lat1)]),
    )
}

#[test]
fn test_full_pipeline() {
    let mut survey = ouargla_parcel();
    survey
        .convert_all(&SmartReprojector::default(), "NordSahara", 31)
        .unwrap();
    assert!(survey.is_converted());

    // Surface en hectares, unité choisie par l'appelant
    let hectares = AreaUnit::Hectares.from_square_meters(area(&survey.raw_ring()));
    assert_eq!(hectares, 4.0);
    assert!(signed_area(&survey.raw_ring()) > 0.0);

    // La parcelle est vers 31.9°N, 5.3°E
    let geo = survey.geographic_ring().unwrap();
    let first = geo.coords()[0];
    assert!((first.x - 5.33).abs() < 0.1, "lon={}", first.x);
    assert!((first.y - 31.95).abs() < 0.1, "lat={}", first.y);

    let boundaries = vec![
        boxed("Alger", 2.8, 36.6, 3.3, 36.9),
        boxed("Ouargla", 4.5, 31.0, 6.5, 33.0),
        boxed("Sud", 0.0, 20.0, 10.0, 32.5),
    ];
    let result = intersect(&geo, &boundaries, MatchPolicy::FirstMatch).unwrap();
    let overlap = result.first().unwrap();
    assert_eq!(overlap.boundary_name, "Ouargla");
    assert_eq!(result.overlaps().len(), 1);

    // Parcelle entièrement incluse : l'intersection est la parcelle
    let all = intersect(&geo, &boundaries, MatchPolicy::AllOverlaps).unwrap();
    assert_eq!(all.overlaps().len(), 2);
    let geo_area = area(&geo);
    for o in all.overlaps() {
        assert!((o.area - geo_area).abs() / geo_area < 1e-6);
    }

    let doc = String::from_utf8(serialize(&geo, &KmlStyle::default()).unwrap()).unwrap();
    assert_eq!(doc.matches(",0").count(), 5);
    assert!(doc.contains("<color>ffff0000</color>"));
}

#[test]
fn test_no_boundary_is_not_an_error() {
    let mut survey = ouargla_parcel();
    survey
        .convert_all(&SmartReprojector::default(), "NordSahara", 31)
        .unwrap();

    let far = vec![boxed("Tamanrasset", 4.0, 22.0, 6.5, 23.5)];
    let result = intersect(&survey.geographic_ring().unwrap(), &far, MatchPolicy::FirstMatch);
    assert!(matches!(result, Ok(ref r) if r.is_empty()));
}

#[test]
fn test_invalid_inputs() {
    let mut survey = ouargla_parcel();
    let engine = SmartReprojector::default();

    assert_eq!(
        survey.convert_all(&engine, "Merchich", 31),
        Err(GeodesyError::UnknownSystem("Merchich".to_string()))
    );
    assert_eq!(
        survey.convert_all(&engine, "NordSahara", 0),
        Err(GeodesyError::InvalidZone(0))
    );
    assert_eq!(
        survey.convert_all(&engine, "NordSahara", 61),
        Err(GeodesyError::InvalidZone(61))
    );
    assert!(!survey.is_converted());

    // Rien à exporter avant conversion
    assert_eq!(survey.geographic_ring(), None);
    assert_eq!(
        serialize(&Ring::default(), &KmlStyle::default()),
        Err(GeodesyError::EmptyRing)
    );
}
