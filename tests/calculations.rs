mod common;

use approx::assert_abs_diff_eq;
use refcalc::error::INFINITE_RESULT_NOTE;
use refcalc::{Branch, ConfigPatch, PressureRequest, StateRequest, TemperatureRequest};

fn r744_celsius_bar() -> ConfigPatch {
    ConfigPatch::new().refrigerant("R744").temp_unit("C").pressure_unit("bar")
}

// ═══════════════════════════════════════════════════════════════════
//  Superheat / subcooling on the solver path
// ═══════════════════════════════════════════════════════════════════

#[test]
fn r744_superheat_above_dew_point() {
    let (service, _) = common::service();
    service.init(&r744_celsius_bar());

    let result = service.calculate_superheat(&StateRequest::new(5.0, 33.84));
    let report = result.success().expect("superheat should succeed");

    assert_abs_diff_eq!(report.superheat, 5.0, epsilon = 1e-6);
    assert_abs_diff_eq!(report.saturation_temperature, 0.0, epsilon = 1e-6);
    assert_eq!(report.refrigerant, "R744");
    assert_eq!(report.units.temperature.symbol(), "C");
    assert_eq!(report.units.pressure.symbol(), "bar");
}

#[test]
fn r744_five_kelvin_superheat_at_minus_35() {
    let (service, _) = common::service();
    service.init(&r744_celsius_bar());

    // 9.03 barg saturates at -40 °C
    let report = service.calculate_superheat(&StateRequest::new(-35.0, 9.03)).into_success().unwrap();
    assert!(
        (report.superheat - 5.0).abs() < 0.1,
        "SH expected ≈ 5 K, got {:.4}",
        report.superheat
    );
}

#[test]
fn r744_subcooling_below_bubble_point() {
    let (service, _) = common::service();
    service.init(&r744_celsius_bar());

    let result = service.calculate_subcooling(&StateRequest::new(-25.0, 18.68));
    let report = result.success().expect("subcooling should succeed");

    assert_abs_diff_eq!(report.subcooling, 5.0, epsilon = 1e-6);
    assert_abs_diff_eq!(report.saturation_temperature, -20.0, epsilon = 1e-6);
}

#[test]
fn wrong_side_of_the_dome_clamps_to_zero() {
    let (service, _) = common::service();
    service.init(&r744_celsius_bar());

    let sh = service.calculate_superheat(&StateRequest::new(-5.0, 33.84));
    assert_eq!(sh.success().unwrap().superheat, 0.0);

    let sc = service.calculate_subcooling(&StateRequest::new(5.0, 33.84));
    assert_eq!(sc.success().unwrap().subcooling, 0.0);
}

#[test]
fn fahrenheit_reports_degree_f_differences() {
    let (service, _) = common::service();
    service.init(&ConfigPatch::new().refrigerant("R744").temp_unit("F").pressure_unit("bar"));

    let report = service.calculate_superheat(&StateRequest::new(41.0, 33.84)).into_success().unwrap();
    // 5 K above a 32 °F dew point
    assert_abs_diff_eq!(report.superheat, 9.0, epsilon = 1e-6);
    assert_abs_diff_eq!(report.saturation_temperature, 32.0, epsilon = 1e-6);
}

#[test]
fn kelvin_and_gauge_pascal_by_default() {
    let (service, _) = common::service();
    service.init(&ConfigPatch::new().refrigerant("R744"));

    // 3 384 000 Pa gauge is the 0 °C dew point
    let report = service.calculate_superheat(&StateRequest::new(275.15, 3_384_000.0)).into_success().unwrap();
    assert_abs_diff_eq!(report.superheat, 2.0, epsilon = 1e-6);
    assert_abs_diff_eq!(report.saturation_temperature, 273.15, epsilon = 1e-6);
}

#[test]
fn absolute_pressure_units_skip_the_atmosphere() {
    let (service, _) = common::service();
    service.init(&r744_celsius_bar());

    let gauge = service.calculate_superheat(&StateRequest::new(5.0, 33.84)).into_success().unwrap();
    let absolute = service
        .calculate_superheat(&StateRequest::new(5.0, 34.85325).pressure_unit("bara"))
        .into_success()
        .unwrap();
    assert_abs_diff_eq!(gauge.superheat, absolute.superheat, epsilon = 1e-6);
}

// ═══════════════════════════════════════════════════════════════════
//  Unknown fluids
// ═══════════════════════════════════════════════════════════════════

#[test]
fn unknown_fluid_reports_infinite_subcooling() {
    let (service, _) = common::service();
    service.init(&ConfigPatch::new().refrigerant("R507").temp_unit("C").pressure_unit("bar"));

    let result = service.calculate_subcooling(&StateRequest::new(10.0, 20.0));
    assert!(result.is_error());
    assert_eq!(result.message(), Some("Subcooling is infinity"));
    assert_eq!(result.note(), Some(INFINITE_RESULT_NOTE));
}

#[test]
fn unknown_fluid_reports_infinite_superheat() {
    let (service, _) = common::service();
    service.init(&ConfigPatch::new().refrigerant("R507").temp_unit("C").pressure_unit("bar"));

    let result = service.calculate_superheat(&StateRequest::new(10.0, 20.0));
    assert_eq!(result.message(), Some("Superheat is infinity"));
    assert!(result.note().unwrap().contains("R507a"));
}

// ═══════════════════════════════════════════════════════════════════
//  Saturation lookups
// ═══════════════════════════════════════════════════════════════════

#[test]
fn r744_saturation_temperature_from_pressure() {
    let (service, _) = common::service();
    service.init(&r744_celsius_bar());

    let report = service.get_saturation_temperature(&PressureRequest::new(18.68)).into_success().unwrap();
    assert_abs_diff_eq!(report.temperature, -20.0, epsilon = 1e-6);
    assert_eq!(report.branch, Branch::Liquid);
}

#[test]
fn r744_saturation_pressure_from_temperature() {
    let (service, _) = common::service();
    service.init(&r744_celsius_bar());

    let report = service
        .get_saturation_pressure(&TemperatureRequest::new(-40.0).branch(Branch::Vapor))
        .into_success()
        .unwrap();
    assert_abs_diff_eq!(report.pressure, 9.03, epsilon = 1e-6);
    assert_eq!(report.branch, Branch::Vapor);
}

#[test]
fn saturation_point_has_no_superheat_or_subcooling() {
    let (service, _) = common::service();
    service.init(&r744_celsius_bar());

    for p in [9.03, 18.68, 33.84, 44.01] {
        let t_sat = service
            .get_saturation_temperature(&PressureRequest::new(p))
            .into_success()
            .unwrap()
            .temperature;
        let sh = service.calculate_superheat(&StateRequest::new(t_sat, p)).into_success().unwrap();
        let sc = service.calculate_subcooling(&StateRequest::new(t_sat, p)).into_success().unwrap();
        assert!(sh.superheat.abs() < 1e-6, "SH at {p} bar should be 0, got {}", sh.superheat);
        assert!(sc.subcooling.abs() < 1e-6, "SC at {p} bar should be 0, got {}", sc.subcooling);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Blend tables
// ═══════════════════════════════════════════════════════════════════

#[test]
fn r448a_superheat_comes_from_the_table() {
    let (service, solver) = common::service();
    service.init(&ConfigPatch::new().refrigerant("R448A").temp_unit("C").pressure_unit("psig"));

    // Dew point at 60.1 psig is 0 °C
    let report = service.calculate_superheat(&StateRequest::new(5.0, 60.1)).into_success().unwrap();
    assert_abs_diff_eq!(report.superheat, 5.0, epsilon = 1e-6);
    assert_abs_diff_eq!(report.saturation_temperature, 0.0, epsilon = 1e-6);
    assert_eq!(solver.calls(), 0, "table refrigerants must not reach the solver");
}

#[test]
fn r449a_subcooling_uses_the_bubble_curve() {
    let (service, _) = common::service();
    service.init(&ConfigPatch::new().refrigerant("r449a").temp_unit("C").pressure_unit("psig"));

    // Bubble point at 74.05 psig is 0 °C
    let report = service.calculate_subcooling(&StateRequest::new(-3.0, 74.05)).into_success().unwrap();
    assert_abs_diff_eq!(report.subcooling, 3.0, epsilon = 1e-6);
    assert_eq!(report.refrigerant, "r449a");
}

#[test]
fn r407f_saturation_pressure_interpolates() {
    let (service, _) = common::service();
    service.init(&ConfigPatch::new().refrigerant("R407F").temp_unit("C").pressure_unit("psig"));

    let report = service.get_saturation_pressure(&TemperatureRequest::new(-35.0)).into_success().unwrap();
    // halfway between 6.3 and 15.7 psig
    assert_abs_diff_eq!(report.pressure, 11.0, epsilon = 1e-6);
}

#[test]
fn table_extrapolates_past_the_last_row() {
    let (service, _) = common::service();
    service.init(&ConfigPatch::new().refrigerant("R448A").temp_unit("C").pressure_unit("psig"));

    let report = service
        .get_saturation_pressure(&TemperatureRequest::new(60.0).branch(Branch::Vapor))
        .into_success()
        .unwrap();
    // last segment: 229 -> 295 psig over 40 -> 50 °C
    assert_abs_diff_eq!(report.pressure, 361.0, epsilon = 1e-6);
}

// ═══════════════════════════════════════════════════════════════════
//  Property bundle
// ═══════════════════════════════════════════════════════════════════

#[test]
fn properties_echo_the_state_and_label_units() {
    let (service, _) = common::service();
    service.init(&r744_celsius_bar());

    let report = service.get_properties(&StateRequest::new(20.0, 10.0)).into_success().unwrap();
    let props = &report.properties;
    assert_abs_diff_eq!(props.temperature, 20.0, epsilon = 1e-9);
    assert_abs_diff_eq!(props.pressure, 10.0, epsilon = 1e-9);
    assert_abs_diff_eq!(props.density, 1_101_325.0 / (188.9 * 293.15), epsilon = 1e-6);
    assert_eq!(props.specific_heat, 900.0);
    assert_eq!(report.units.density, "kg/m³");
    assert_eq!(report.units.viscosity, "Pa·s");
    assert_eq!(report.units.quality, "dimensionless");
}

#[test]
fn properties_refuse_table_refrigerants() {
    let (service, solver) = common::service();
    service.init(&ConfigPatch::new().refrigerant("R448A"));

    let result = service.get_properties(&StateRequest::new(280.0, 500_000.0));
    assert_eq!(result.message(), Some("Custom refrigerants are not supported for getProperties"));
    assert_eq!(solver.calls(), 0);
}

#[test]
fn props_si_passes_straight_through() {
    let (service, _) = common::service();
    let t = service
        .props_si(
            refcalc::PropCode::Temperature,
            refcalc::PropCode::Pressure, 3_485_325.0,
            refcalc::PropCode::Quality, 0.0,
            Some("CO2"),
        )
        .unwrap();
    assert_abs_diff_eq!(t, 273.15, epsilon = 1e-6);
    // no configuration needed, none created
    assert_eq!(service.get_config().refrigerant, None);
}

#[test]
fn props_si_falls_back_to_the_default_refrigerant() {
    use refcalc::PropCode;

    let (service, _) = common::service();
    let err = service
        .props_si(PropCode::Pressure, PropCode::Temperature, 253.15, PropCode::Quality, 1.0, None)
        .unwrap_err();
    assert!(matches!(err, refcalc::RefcalcError::MissingRefrigerant { .. }));

    service.init(&ConfigPatch::new().refrigerant("R744"));
    let p = service
        .props_si(PropCode::Pressure, PropCode::Temperature, 253.15, PropCode::Quality, 1.0, None)
        .unwrap();
    assert_abs_diff_eq!(p, 1_969_325.0, epsilon = 1e-3);
}

// ═══════════════════════════════════════════════════════════════════
//  Non-finite input
// ═══════════════════════════════════════════════════════════════════

#[test]
fn nan_temperature_is_rejected_not_clamped() {
    let (service, solver) = common::service();
    service.init(&r744_celsius_bar());

    let result = service.calculate_superheat(&StateRequest::new(f64::NAN, 33.84));
    assert_eq!(result.message(), Some("Invalid input: temperature must be a finite number, got NaN"));

    let result = service.calculate_subcooling(&StateRequest::new(f64::INFINITY, 33.84));
    assert_eq!(result.message(), Some("Invalid input: temperature must be a finite number, got inf"));
    assert_eq!(solver.calls(), 0, "invalid input must not reach the solver");
}

#[test]
fn non_finite_values_are_rejected_on_the_table_path_too() {
    let (service, _) = common::service();
    service.init(&ConfigPatch::new().refrigerant("R448A").temp_unit("C").pressure_unit("psig"));

    let sh = service.calculate_superheat(&StateRequest::new(f64::NAN, 60.1));
    assert!(sh.message().unwrap().starts_with("Invalid input: temperature must be a finite number"));

    let sc = service.calculate_subcooling(&StateRequest::new(0.0, f64::NEG_INFINITY));
    assert_eq!(sc.message(), Some("Invalid input: pressure must be a finite number, got -inf"));

    let p = service.get_saturation_pressure(&TemperatureRequest::new(f64::NAN));
    assert!(p.is_error());
    let t = service.get_saturation_temperature(&PressureRequest::new(f64::INFINITY));
    assert!(t.is_error());
}

#[test]
fn rejected_input_does_not_change_the_config() {
    let (service, _) = common::service();
    service.init(&r744_celsius_bar());

    let result = service.get_properties(&StateRequest::new(f64::NAN, 10.0).refrigerant("R134a"));
    assert!(result.is_error());
    assert_eq!(service.get_config().refrigerant.as_deref(), Some("R744"));
}

// ═══════════════════════════════════════════════════════════════════
//  Below the first table row
// ═══════════════════════════════════════════════════════════════════

#[test]
fn table_extrapolates_below_the_first_row() {
    let (service, _) = common::service();
    service.init(&ConfigPatch::new().refrigerant("R448A").temp_unit("C").pressure_unit("psig"));

    let report = service
        .get_saturation_pressure(&TemperatureRequest::new(-50.0).branch(Branch::Vapor))
        .into_success()
        .unwrap();
    // first segment: 8.2 -> 0.0 psig over -30 -> -40 °C
    assert_abs_diff_eq!(report.pressure, -8.2, epsilon = 1e-6);

    let report = service
        .get_saturation_temperature(&PressureRequest::new(1.3))
        .into_success()
        .unwrap();
    // bubble: 5.9 psig at -40 °C, 15.1 psig at -30 °C
    assert_abs_diff_eq!(report.temperature, -45.0, epsilon = 1e-6);
}
