//! 표준 용량 선정과 조회표 동작 테스트.
use motor_derating_toolbox::{
    derating::Field,
    reference_data::{lookup_fraction, LookupTable, StandardSizeList, DEFAULT_STANDARD_SIZES},
    standard_size::{select_standard_size, StandardSize},
};

fn pick(target: f64) -> StandardSize {
    select_standard_size(Field::Number(target), &StandardSizeList::default())
}

#[test]
fn rounds_up_to_next_size() {
    assert_eq!(pick(4.0), StandardSize::Size(5.0));
    assert_eq!(pick(0.2), StandardSize::Size(1.0));
    assert_eq!(pick(101.0), StandardSize::Size(125.0));
}

#[test]
fn member_selects_itself() {
    for size in DEFAULT_STANDARD_SIZES {
        assert_eq!(pick(size), StandardSize::Size(size));
    }
    assert_eq!(pick(800.0).to_string(), "800");
}

#[test]
fn above_max_reports_overflow() {
    let s = pick(900.0);
    assert_eq!(s, StandardSize::Exceeds(800.0));
    assert_eq!(s.to_string(), ">800 HP");
}

#[test]
fn overflow_marker_shows_whole_maximum() {
    assert_eq!(StandardSize::Exceeds(1e20).to_string(), ">100000000000000000000 HP");
    assert_eq!(StandardSize::Exceeds(812.7).to_string(), ">812 HP");
    assert_eq!(StandardSize::Exceeds(f64::NAN).to_string(), ">800 HP");
}

#[test]
fn blank_zero_and_negative_targets_select_nothing() {
    let sizes = StandardSizeList::default();
    assert!(select_standard_size(Field::Blank, &sizes).is_blank());
    assert!(pick(0.0).is_blank());
    assert!(pick(-3.0).is_blank());
    assert_eq!(StandardSize::Blank.to_string(), " ");
}

#[test]
fn custom_list_is_sorted_and_deduplicated() {
    let sizes = StandardSizeList::new([10.0, 2.0, 5.0, 5.0, -1.0, f64::NAN]).expect("non-empty list");
    assert_eq!(sizes.as_slice(), &[2.0, 5.0, 10.0]);
    assert_eq!(sizes.max(), Some(10.0));
    assert_eq!(
        select_standard_size(Field::Number(11.0), &sizes).to_string(),
        ">10 HP"
    );
    assert!(StandardSizeList::new([0.0, -2.0]).is_none());
}

#[test]
fn fractional_size_is_displayed_trimmed() {
    assert_eq!(pick(6.0).to_string(), "7.5");
    assert_eq!(pick(1.2).to_string(), "1.5");
}

#[test]
fn lookup_requires_exact_key() {
    let table = LookupTable::from_pairs([(40.0, 100.0), (50.0, 80.0)]);
    assert_eq!(lookup_fraction(Some(50.0), &table), Field::Number(0.8));
    assert!(lookup_fraction(Some(49.9999), &table).is_blank());
    assert!(lookup_fraction(Some(45.0), &table).is_blank());
    assert!(lookup_fraction(None, &table).is_blank());
}

#[test]
fn lookup_treats_negative_zero_as_zero() {
    let table = LookupTable::from_pairs([(0.0, 95.0), (f64::NAN, 10.0)]);
    assert_eq!(table.len(), 1);
    assert_eq!(table.percentage(-0.0), Some(95.0));
}

#[test]
fn duplicate_keys_keep_last_value() {
    let table = LookupTable::from_pairs([(1000.0, 100.0), (1000.0, 97.0)]);
    assert_eq!(table.percentage(1000.0), Some(97.0));
}
