mod utils;

use field_analysis::{
    constants::{g, rdocp},
    extrapolate_geopotential_sfc2p, extrapolate_temperature_sfc2p, potential_temperature,
    relative_humidity, source::*, wind_direction, wind_speed, zero_degree_isotherm_height,
    AnalysisError, FieldAttrs, LevelType, Parameter, Phase, VectorReference,
};
use utils::*;

fn keys(pairs: &[(&str, &str)]) -> RequestKeys {
    pairs
        .iter()
        .map(|&(k, v)| (k.to_owned(), v.to_owned()))
        .collect()
}

#[test]
fn test_zero_degree_isotherm_standard_atmosphere() {
    init_logging();
    let atm = Atmosphere::new(20, 500.0);

    let hzerocl = zero_degree_isotherm_height(&atm.t, &atm.hhl, false).unwrap();
    assert_eq!(hzerocl.shape(), &[NY, NX]);
    assert_eq!(hzerocl.level_type(), &LevelType::Surface);

    // Linear temperature profile, so the interpolation is exact
    let expected = (288.15 - 273.15) / 0.0065;
    for &h in hzerocl.data().iter() {
        assert!(approx_equal(h, expected, 1.0e-6), "{} != {}", h, expected);
    }
}

#[test]
fn test_relative_humidity_bounds() {
    let atm = Atmosphere::new(10, 400.0);

    let rh = relative_humidity(&atm.qv, &atm.t, &atm.p, true, Phase::from_name("water").unwrap())
        .unwrap();
    assert_eq!(rh.shape(), atm.t.shape());
    assert!(rh.data().iter().all(|&v| (0.0..=100.0).contains(&v)));

    assert!(matches!(
        relative_humidity(&atm.qv, &atm.t, &atm.p, true, Phase::WaterIce),
        Err(AnalysisError::NotImplemented(_))
    ));
}

#[test]
fn test_wind_on_grid() {
    let geo = |short_name: &str, field: field_analysis::Field| {
        let mut attrs = FieldAttrs::model_level(Parameter::new(short_name, short_name, "m s-1"));
        attrs.vref = VectorReference::Geo;
        field.with_attrs(attrs)
    };
    let u = geo("U", grid_field(5, |k, _, i| k as f64 - i as f64));
    let v = geo("V", grid_field(5, |k, j, _| 2.0 * k as f64 + j as f64 + 1.0));

    let sp = wind_speed(&u, &v).unwrap();
    let dd = wind_direction(&u, &v).unwrap();

    for ((&s, &d), (&u, &v)) in sp
        .data()
        .iter()
        .zip(dd.data().iter())
        .zip(u.data().iter().zip(v.data().iter()))
    {
        assert!(approx_equal(s, u.hypot(v), 1.0e-10));
        assert!((0.0..=360.0).contains(&d));
    }
    assert_eq!(sp.attrs().parameter.short_name, "SP");
    assert_eq!(dd.attrs().parameter.units, "degrees");
}

#[test]
fn test_extrapolate_to_sea_level() {
    let atm = Atmosphere::new(5, 100.0);
    let t_sfc = surface_field(|_, i| standard_temperature(terrain_height(i)));
    let p_sfc = surface_field(|_, i| standard_pressure(terrain_height(i)));
    let h_sfc = surface_field(|_, i| terrain_height(i));
    assert_eq!(atm.hsurf.data(), h_sfc.data());

    let t_msl = extrapolate_temperature_sfc2p(&t_sfc, &h_sfc, &p_sfc, 101_325.0).unwrap();
    assert_eq!(t_msl.shape(), &[1, NY, NX]);
    assert_eq!(t_msl.level_type(), &LevelType::Pressure);
    for &t in t_msl.data().iter() {
        assert!(approx_equal(t, 288.15, 0.05), "{}", t);
    }

    let fi = extrapolate_geopotential_sfc2p(&h_sfc, &t_sfc, &p_sfc, 101_325.0).unwrap();
    assert_eq!(fi.attrs().parameter.short_name, "FI");
    for &fi in fi.data().iter() {
        assert!(approx_equal(fi / g, 0.0, 1.0), "{}", fi / g);
    }

    assert!(matches!(
        extrapolate_temperature_sfc2p(&t_sfc, &h_sfc, &p_sfc, 0.0),
        Err(AnalysisError::OutOfRangeTarget { .. })
    ));
}

#[test]
fn test_retrieve_then_derive() {
    init_logging();
    let atm = Atmosphere::new(8, 500.0);

    let config = SourceConfig::default()
        .with_grib_definitions(GribDefinitions::from_name("cosmo").unwrap())
        .with_template_key("levtype", "ml");
    let source = MemorySource::new(config)
        .with_field(keys(&[("param", "T"), ("levtype", "ml")]), atm.t.clone())
        .with_field(keys(&[("param", "P"), ("levtype", "ml")]), atm.p.clone())
        .with_field(keys(&[("param", "HSURF"), ("levtype", "sfc")]), atm.hsurf.clone());

    let t = source.retrieve(&Request::from("T")).unwrap().remove(0);
    let p = source.retrieve(&Request::from("P")).unwrap().remove(0);
    let hsurf = source.retrieve(&Request::from(("HSURF", "sfc"))).unwrap();
    assert_eq!(hsurf.len(), 1);

    let pt = potential_temperature(&p, &t).unwrap();
    assert_eq!(pt.attrs().parameter.short_name, "PT");
    for ((&pt, &p), &t) in pt
        .data()
        .iter()
        .zip(atm.p.data().iter())
        .zip(atm.t.data().iter())
    {
        assert!(approx_equal(pt, t * (1.0e5 / p).powf(rdocp), 1.0e-9));
    }

    // Potential temperature increases with height in a stable atmosphere
    let ax = pt.vertical_axis().unwrap();
    for lane in pt.data().lanes(ax) {
        assert!(lane.windows(2).into_iter().all(|w| w[0] > w[1]));
    }

    assert!(matches!(
        source.retrieve(&Request::from("QV")),
        Err(AnalysisError::FieldNotFound(_))
    ));
}
