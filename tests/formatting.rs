//! 화면 표시 문자열, 입력 해석, 단위 변환 테스트.
use motor_derating_toolbox::{
    conversion::{convert_power_str, parse_power_unit},
    derating::{Field, Pipeline},
    format::{format_field, format_field_with, format_number, FRACTION_DECIMALS},
    input::{parse_calculation_input, parse_optional, InputError},
    units::{to_kilowatts, to_watts, PowerUnit},
};

#[test]
fn numbers_drop_trailing_zeros() {
    assert_eq!(format_number(7.5, 2), "7.5");
    assert_eq!(format_number(12.0, 2), "12");
    assert_eq!(format_number(7.456, 2), "7.46");
    assert_eq!(format_number(100.0, 0), "100");
    assert_eq!(format_number(-5.75, 2), "-5.75");
}

#[test]
fn blank_field_renders_single_space() {
    assert_eq!(format_field(Field::Blank), " ");
    assert_eq!(format_field(Field::Number(0.0)), "0");
    assert_eq!(format_field_with(Field::Number(0.925), FRACTION_DECIMALS), "0.925");
}

#[test]
fn watts_follow_kilowatts() {
    for hp in [0.5, 1.0, 10.0, 250.0, 800.0] {
        assert!((to_kilowatts(hp) - hp / 1.341).abs() < 1e-12);
        assert!((to_watts(hp) - to_kilowatts(hp) * 1000.0).abs() < 1e-9);
    }
}

#[test]
fn power_units_parse_case_insensitively() {
    assert_eq!(parse_power_unit(" kW ").unwrap(), PowerUnit::Kilowatt);
    assert_eq!(parse_power_unit("HP").unwrap(), PowerUnit::Horsepower);
    assert_eq!(parse_power_unit("watt").unwrap(), PowerUnit::Watt);
    assert!(parse_power_unit("BTU/h").is_err());
}

#[test]
fn power_conversion_matches_worksheet_factor() {
    let kw = convert_power_str(10.0, "hp", "kW").unwrap();
    assert!((kw - 7.457121551081283).abs() < 1e-9);
    let hp = convert_power_str(7457.121551081283, "W", "hp").unwrap();
    assert!((hp - 10.0).abs() < 1e-9);
}

#[test]
fn blank_input_is_not_an_error() {
    assert_eq!(parse_optional("HP (I2)", "").unwrap(), None);
    assert_eq!(parse_optional("HP (I2)", "   ").unwrap(), None);
    assert_eq!(parse_optional("HP (I2)", " 12.5 ").unwrap(), Some(12.5));
    assert_eq!(parse_optional("FASL/MASL (Q8)", "-10").unwrap(), Some(-10.0));
}

#[test]
fn non_numeric_input_names_the_field() {
    let err = parse_calculation_input(Pipeline::Altitude, "ten", "1000").unwrap_err();
    assert_eq!(err.field(), "HP (I8)");
    assert!(matches!(err, InputError::NotNumeric { .. }));

    let err = parse_calculation_input(Pipeline::Ambient, "10", "warm").unwrap_err();
    assert_eq!(err.field(), "Ambient °C (Q2)");
}

#[test]
fn non_finite_input_is_rejected() {
    let err = parse_optional("HP (I2)", "inf").unwrap_err();
    assert!(matches!(err, InputError::NotFinite { .. }));
    assert!(parse_optional("HP (I2)", "NaN").is_err());
}
