#[cfg(test)]
mod tests {
    use std::fs::File;
    use std::io::BufReader;
    use std::path::Path;

    use float_cmp::approx_eq;
    use test_case::test_case;

    use site_geo::analysis::{SiteInput, analyze_site};
    use site_geo::compliance;
    use site_geo::entrance::{Strategy, infer_entrance_direction};
    use site_geo::geometry::geo_enums::{CompassDirection, GeoPosition};
    use site_geo::geometry::primitives::GeoPoint;
    use site_geo::geometry::projection::{self, METERS_PER_DEG_LAT, METERS_PER_DEG_LNG};
    use site_geo::io::export::export_report;
    use site_geo::io::ext_repr::ExtSite;
    use site_geo::io::import::import_site;
    use site_geo::metrics;
    use site_geo::setback::{self, SetbackSpec};
    use site_geo::simplification::simplify_polygon;
    use site_geo::util::{EngineConfig, EntranceConfig, SetbackMode, SimplifyConfig, assertions};

    fn read_site(path: &str) -> ExtSite {
        let file = File::open(Path::new(path)).unwrap();
        serde_json::from_reader(BufReader::new(file)).unwrap()
    }

    fn offset(origin: &GeoPoint, east_m: f64, north_m: f64) -> GeoPoint {
        GeoPoint::new(
            origin.latitude + north_m / METERS_PER_DEG_LAT,
            origin.longitude
                + east_m / (METERS_PER_DEG_LNG * origin.latitude.to_radians().cos()),
        )
    }

    fn engine_config(mode: SetbackMode) -> EngineConfig {
        EngineConfig {
            setbacks: SetbackSpec {
                front: 4.0,
                rear: 3.0,
                side_left: 1.5,
                side_right: 1.5,
            },
            setback_mode: mode,
            simplification: Some(SimplifyConfig::new(0.5)),
            entrance: EntranceConfig::default(),
        }
    }

    #[test_case("../assets/rectangular_lot.json", SetbackMode::Averaged, true; "rectangular averaged")]
    #[test_case("../assets/rectangular_lot.json", SetbackMode::PerEdge, true; "rectangular per edge")]
    #[test_case("../assets/l_shaped_lot.json", SetbackMode::Averaged, false; "l-shaped averaged")]
    #[test_case("../assets/triangular_lot.json", SetbackMode::Averaged, true; "triangular averaged")]
    #[test_case("../assets/triangular_lot.json", SetbackMode::PerEdge, true; "triangular per edge")]
    fn analyze_asset(path: &str, mode: SetbackMode, convex: bool) {
        let _ = env_logger::builder().is_test(true).try_init();
        let ext_site = read_site(path);
        let input = import_site(&ext_site).unwrap();
        let analysis = analyze_site(&input, &engine_config(mode));

        let m = &analysis.metrics;
        assert!(m.area_m2 > 0.0 && m.perimeter_m > 0.0);
        assert!((0.0..180.0).contains(&m.orientation_deg));
        assert_eq!(m.vertex_count, analysis.working_boundary.len());
        assert!(analysis.working_boundary.len() >= 3);

        //the buildable area is strictly smaller, and contained in the boundary for convex sites
        let buildable = &m.setback_polygon;
        assert!(buildable.area_m2() < m.area_m2);
        if convex {
            let boundary_local = projection::project(&analysis.working_boundary, &buildable.origin);
            assert!(assertions::inset_within_boundary(&boundary_local, &buildable.points));
        }

        assert!(assertions::entrance_inference_is_valid(&analysis.entrance));
        if let Some(report) = &analysis.compliance {
            assert!(assertions::compliance_report_is_consistent(
                report,
                input.footprint.as_ref().map_or(0, |f| f.len())
            ));
        }

        let report = export_report(&ext_site.id, &analysis, "2026-01-01T00:00:00Z".to_string());
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains(&ext_site.id));
    }

    #[test]
    fn noisy_l_shape_is_simplified() {
        let input = import_site(&read_site("../assets/l_shaped_lot.json")).unwrap();
        assert_eq!(input.boundary.len(), 12);
        let analysis = analyze_site(&input, &engine_config(SetbackMode::Averaged));
        assert!(analysis.simplified);
        assert!(analysis.working_boundary.len() <= 8);
        //southern hemisphere: the preferred solar bearing is north
        assert!(approx_eq!(
            f64,
            input.solar.unwrap().preferred_bearing_deg,
            0.0
        ));
    }

    #[test]
    fn road_decides_the_entrance_of_the_rectangular_lot() {
        let input = import_site(&read_site("../assets/rectangular_lot.json")).unwrap();
        let analysis = analyze_site(&input, &engine_config(SetbackMode::Averaged));
        assert_eq!(analysis.entrance.direction, CompassDirection::W);
        let strategies = analysis
            .entrance
            .rationale
            .iter()
            .map(|r| r.strategy)
            .collect::<Vec<_>>();
        assert_eq!(strategies[..2], [Strategy::LongestEdge, Strategy::RoadProximity]);
    }

    #[test_case(10.0; "ten meters")]
    #[test_case(25.0; "twenty five meters")]
    #[test_case(100.0; "hundred meters")]
    fn square_area(size: f64) {
        let o = GeoPoint::new(35.6762, 139.6503);
        let square = vec![
            o,
            offset(&o, size, 0.0),
            offset(&o, size, size),
            offset(&o, 0.0, size),
        ];
        let expected = size * size;
        let a = metrics::area(&square);
        assert!((a - expected).abs() / expected < 0.02, "area {a}");
    }

    #[test_case(0.0, 0.0; "equator")]
    #[test_case(48.8566, 2.3522; "paris")]
    #[test_case(-33.8688, 151.2093; "sydney")]
    #[test_case(64.1466, -21.9426; "reykjavik")]
    fn projection_round_trip(lat: f64, lng: f64) {
        let origin = GeoPoint::new(lat, lng);
        let points = [
            projection::destination(&origin, 4000.0, 30.0),
            projection::destination(&origin, 2500.0, 200.0),
            projection::destination(&origin, 800.0, 310.0),
        ];
        let back = projection::unproject(&projection::project(&points, &origin), &origin);
        for (p, q) in points.iter().zip(back.iter()) {
            assert!(projection::haversine_distance(p, q) < 1.0);
        }
    }

    #[test]
    fn uniform_inset_strictly_reduces_convex_area() {
        let o = GeoPoint::new(59.3293, 18.0686);
        let poly = vec![
            o,
            offset(&o, 40.0, 5.0),
            offset(&o, 45.0, 30.0),
            offset(&o, 10.0, 38.0),
        ];
        for d in [0.5, 2.0, 8.0, 50.0] {
            let inset = setback::uniform_inset(&poly, d);
            assert!(inset.area_m2() < metrics::area(&poly));
            assert!(inset.to_geo().iter().all(|p| compliance::point_in_polygon(p, &poly)));
        }
    }

    #[test]
    fn disjoint_footprint_is_clipped_onto_the_boundary() {
        let o = GeoPoint::new(41.9028, 12.4964);
        let boundary = vec![o, offset(&o, 20.0, 0.0), offset(&o, 20.0, 20.0), offset(&o, 0.0, 20.0)];
        let footprint = vec![
            offset(&o, 25.0, 25.0),
            offset(&o, 35.0, 25.0),
            offset(&o, 35.0, 35.0),
            offset(&o, 25.0, 35.0),
        ];
        let correction = compliance::correct_footprint(&footprint, &boundary);
        assert_eq!(correction.before.compliance_percentage, 0.0);
        assert_eq!(correction.after.compliance_percentage, 100.0);
        assert_eq!(correction.corrected_indices, vec![0, 1, 2, 3]);
        for v in &correction.footprint {
            assert_eq!(compliance::locate_point(v, &boundary), GeoPosition::Boundary);
        }
    }

    #[test]
    fn simplification_never_degenerates() {
        let o = GeoPoint::new(-23.5505, -46.6333);
        let sliver = vec![o, offset(&o, 50.0, 0.0), offset(&o, 50.0, 0.2), offset(&o, 0.0, 0.2)];
        for tol in [0.0, 0.1, 1.0, 10.0, 1000.0] {
            assert!(simplify_polygon(&sliver, &SimplifyConfig::new(tol)).len() >= 3);
        }
    }

    #[test]
    fn rectangle_with_long_north_edge_faces_north() {
        let o = GeoPoint::new(55.7558, 37.6173);
        let site = vec![o, offset(&o, 30.0, 0.0), offset(&o, 32.0, 12.0), offset(&o, -2.0, 12.0)];
        let inference = infer_entrance_direction(&site, &[], None, &EntranceConfig::default());
        assert_eq!(inference.direction, CompassDirection::N);
        assert!(approx_eq!(f64, inference.confidence, 0.7));
        assert_eq!(inference.rationale.len(), 1);
        assert_eq!(inference.rationale[0].strategy, Strategy::LongestEdge);
    }

    #[test]
    fn per_edge_setbacks_differ_from_averaged() {
        let o = GeoPoint::new(52.52, 13.405);
        let site = vec![o, offset(&o, 40.0, 0.0), offset(&o, 40.0, 30.0), offset(&o, 0.0, 30.0)];
        let setbacks = SetbackSpec {
            front: 8.0,
            rear: 2.0,
            side_left: 2.0,
            side_right: 2.0,
        };
        let averaged = setback::buildable_area(&site, &setbacks, 180.0, SetbackMode::Averaged);
        let per_edge = setback::buildable_area(&site, &setbacks, 180.0, SetbackMode::PerEdge);
        assert!((per_edge.area_m2() - 36.0 * 20.0).abs() < 1.0);
        assert!(averaged.area_m2() != per_edge.area_m2());
    }

    #[test]
    fn footprintless_site_has_no_compliance() {
        let o = GeoPoint::new(1.3521, 103.8198);
        let input = SiteInput::new(vec![o, offset(&o, 15.0, 0.0), offset(&o, 15.0, 15.0)]);
        let analysis = analyze_site(&input, &EngineConfig::default());
        assert!(analysis.compliance.is_none());
        assert!(!analysis.simplified);
    }

    #[cfg(feature = "geo-interop")]
    #[test]
    fn geo_types_polygon_round_trip() {
        let o = GeoPoint::new(47.3769, 8.5417);
        let ring = vec![o, offset(&o, 10.0, 0.0), offset(&o, 10.0, 10.0)];
        let polygon = GeoPoint::ring_to_geo_polygon(&ring);
        assert_eq!(GeoPoint::ring_from_geo_polygon(&polygon), ring);
    }
}
