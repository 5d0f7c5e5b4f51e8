//! Fixed province/unit hierarchy and calendar choices.
//!
//! Process-wide static configuration, read-only.

/// Provinces and the organizational units reporting under each of them
pub const PROVINCE_UNITS: &[(&str, &[&str])] = &[
    (
        "همدان",
        &[
            "همدان",
            "ملایر",
            "تویسرکان",
            "اسدآباد",
            "مرکز بهار",
            "مرکز کبودرآهنگ",
            "مرکز رزن",
            "مرکز قروه در گزین",
            "مرکز سامن",
        ],
    ),
    (
        "مرکزی",
        &[
            "اراک",
            "ساوه",
            "آشتیان",
            "تفرش",
            "نراق",
            "کمیجان",
            "مرکز خنداب",
            "خمین",
            "محلات",
            "دلیجان",
            "زرندیه",
            "مرکز جاسب",
            "مرکز مهاجران",
            "مرکز شازند",
            "مرکز آستانه",
            "فراهان",
        ],
    ),
    ("کردستان", &["سنندج", "سقز", "مریوان", "قروه", "بیجار", "مرکز بانه"]),
    (
        "کرمانشاه",
        &[
            "کرمانشاه",
            "اسلام آباد غرب",
            "کنگاور",
            "صحنه",
            "مرکز روانسر",
            "مرکز هرسین",
            "گیلانغرب",
            "مرکز قصر شیرین",
            "مرکز سنقر کلیایی",
        ],
    ),
    ("لرستان", &["واحد خرم آباد", "واحد بروجرد", "واحد الیگودرز", "واحد دورود"]),
];

/// Persian calendar months in calendar order
pub const MONTHS: [&str; 12] = [
    "فروردین",
    "اردیبهشت",
    "خرداد",
    "تیر",
    "مرداد",
    "شهریور",
    "مهر",
    "آبان",
    "آذر",
    "دی",
    "بهمن",
    "اسفند",
];

/// Year pre-selected in the listing filter
pub const DEFAULT_YEAR: &str = "1404";

const FIRST_YEAR: u32 = 1400;
const LAST_YEAR: u32 = 1410;

pub fn provinces() -> impl Iterator<Item = &'static str> {
    PROVINCE_UNITS.iter().map(|(province, _)| *province)
}

/// Units of a province; empty for an unknown province
pub fn units_for(province: &str) -> &'static [&'static str] {
    PROVINCE_UNITS
        .iter()
        .find(|(name, _)| *name == province)
        .map(|(_, units)| *units)
        .unwrap_or(&[])
}

pub fn is_province(province: &str) -> bool {
    PROVINCE_UNITS.iter().any(|(name, _)| *name == province)
}

pub fn is_unit_of(province: &str, unit: &str) -> bool {
    units_for(province).contains(&unit)
}

pub fn is_month(month: &str) -> bool {
    MONTHS.contains(&month)
}

/// Year labels offered by the forms
pub fn years() -> Vec<String> {
    (FIRST_YEAR..=LAST_YEAR).map(|y| y.to_string()).collect()
}
