use serde::{Deserialize, Serialize};

/// 명판 마력 1 kW 당 HP 환산 계수. 원본 워크시트와 같은 값을 쓴다.
pub const HP_PER_KW: f64 = 1.341;

/// 동력 단위. 내부 기준은 HP이다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUnit {
    Horsepower,
    Kilowatt,
    Watt,
}

impl PowerUnit {
    /// 화면 표기용 약어.
    pub fn symbol(&self) -> &'static str {
        match self {
            PowerUnit::Horsepower => "HP",
            PowerUnit::Kilowatt => "kW",
            PowerUnit::Watt => "W",
        }
    }
}

/// HP를 kW로 변환한다. `hp / 1.341`
pub fn to_kilowatts(hp: f64) -> f64 {
    hp / HP_PER_KW
}

/// HP를 W로 변환한다. kW 환산값에 1000을 곱한다.
pub fn to_watts(hp: f64) -> f64 {
    to_kilowatts(hp) * 1000.0
}

fn to_hp(value: f64, unit: PowerUnit) -> f64 {
    match unit {
        PowerUnit::Horsepower => value,
        PowerUnit::Kilowatt => value * HP_PER_KW,
        PowerUnit::Watt => value / 1000.0 * HP_PER_KW,
    }
}

fn from_hp(hp: f64, unit: PowerUnit) -> f64 {
    match unit {
        PowerUnit::Horsepower => hp,
        PowerUnit::Kilowatt => to_kilowatts(hp),
        PowerUnit::Watt => to_watts(hp),
    }
}

/// 동력을 변환한다.
pub fn convert_power(value: f64, from: PowerUnit, to: PowerUnit) -> f64 {
    let hp = to_hp(value, from);
    from_hp(hp, to)
}
