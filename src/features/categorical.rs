//! One-hot categorical families.
//!
//! A family owns a column prefix (e.g. `RatecodeID_`), a parser deciding
//! whether the rest of a column name denotes one of its categories, and a
//! selector returning the category active for the current trip. Columns
//! are matched by prefix *and* parsable suffix, so a direct feature that
//! merely starts with a family prefix (`hour_of_day` vs. `hour_`) is not
//! mistaken for an indicator.

use std::fmt;

use chrono::Weekday;

use super::input::{parse_weekday_name, weekday_name, TripTimes};
use super::{PAYMENT_TYPE, RATE_CODE_ID, TRIP_TYPE};

/// Identifies a categorical family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FamilyId {
    RateCode,
    PaymentType,
    TripType,
    Weekday,
    Hour,
}

impl fmt::Display for FamilyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::RateCode => "rate code",
            Self::PaymentType => "payment type",
            Self::TripType => "trip type",
            Self::Weekday => "weekday",
            Self::Hour => "hour of day",
        };
        f.write_str(name)
    }
}

/// A single category value within a family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Integer code, written `1.0` in float-encoded indicator names.
    Code(u32),
    Weekday(Weekday),
    /// Hour of day, 0–23.
    Hour(u32),
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Code(code) => write!(f, "{code}.0"),
            Self::Weekday(day) => f.write_str(weekday_name(*day)),
            Self::Hour(hour) => write!(f, "{hour}"),
        }
    }
}

/// Parses an indicator-column suffix into a category.
pub type SuffixParser = fn(&str) -> Option<Category>;

/// Returns the category active for a trip.
pub type Selector = fn(&TripTimes) -> Category;

/// Expansion rule for one one-hot family.
#[derive(Clone, Copy)]
pub struct CategoricalFamily {
    id: FamilyId,
    prefix: &'static str,
    parse: SuffixParser,
    active: Selector,
}

impl fmt::Debug for CategoricalFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CategoricalFamily")
            .field("id", &self.id)
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

impl CategoricalFamily {
    /// Create a family from its prefix, suffix parser and selector.
    pub const fn new(
        id: FamilyId,
        prefix: &'static str,
        parse: SuffixParser,
        active: Selector,
    ) -> Self {
        Self {
            id,
            prefix,
            parse,
            active,
        }
    }

    /// Family identifier.
    pub fn id(&self) -> FamilyId {
        self.id
    }

    /// Column prefix.
    pub fn prefix(&self) -> &'static str {
        self.prefix
    }

    /// The category `column` denotes, if it belongs to this family.
    pub fn member(&self, column: &str) -> Option<Category> {
        column.strip_prefix(self.prefix).and_then(self.parse)
    }

    /// Category active for `times`.
    pub fn active(&self, times: &TripTimes) -> Category {
        (self.active)(times)
    }

    /// Indicator value of `category` for `times`: 1.0 when active, else 0.0.
    pub fn indicator(&self, category: Category, times: &TripTimes) -> f64 {
        if category == self.active(times) {
            1.0
        } else {
            0.0
        }
    }

    /// Canonical name of the column the active category would occupy.
    pub fn active_column(&self, times: &TripTimes) -> String {
        format!("{}{}", self.prefix, self.active(times))
    }
}

/// Ordered set of categorical families. The first family whose prefix and
/// suffix both match a column claims it.
#[derive(Debug, Clone)]
pub struct CategoricalRegistry {
    families: Vec<CategoricalFamily>,
}

impl Default for CategoricalRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl CategoricalRegistry {
    /// Registry with no families: every column resolves as a direct field.
    pub fn empty() -> Self {
        Self {
            families: Vec::new(),
        }
    }

    /// Rate code, payment type, trip type, weekday and hour-of-day families.
    pub fn standard() -> Self {
        Self {
            families: vec![
                CategoricalFamily::new(FamilyId::RateCode, "RatecodeID_", parse_code, |_| {
                    Category::Code(RATE_CODE_ID)
                }),
                CategoricalFamily::new(
                    FamilyId::PaymentType,
                    "payment_type_",
                    parse_code,
                    |_| Category::Code(PAYMENT_TYPE),
                ),
                CategoricalFamily::new(FamilyId::TripType, "trip_type_", parse_code, |_| {
                    Category::Code(TRIP_TYPE)
                }),
                CategoricalFamily::new(FamilyId::Weekday, "weekday_", parse_weekday, |t| {
                    Category::Weekday(t.weekday)
                }),
                CategoricalFamily::new(FamilyId::Hour, "hour_", parse_hour, |t| {
                    Category::Hour(t.hour)
                }),
            ],
        }
    }

    /// Append a family.
    pub fn with_family(mut self, family: CategoricalFamily) -> Self {
        self.families.push(family);
        self
    }

    /// Registered families, in match order.
    pub fn families(&self) -> &[CategoricalFamily] {
        &self.families
    }

    /// Family by identifier.
    pub fn family(&self, id: FamilyId) -> Option<&CategoricalFamily> {
        self.families.iter().find(|f| f.id == id)
    }

    /// Find the family that claims `column`, with the category it denotes.
    pub fn classify(&self, column: &str) -> Option<(&CategoricalFamily, Category)> {
        self.families
            .iter()
            .find_map(|family| family.member(column).map(|category| (family, category)))
    }
}

/// Integer codes, plain (`5`) or float-encoded (`5.0`).
fn parse_code(suffix: &str) -> Option<Category> {
    if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
        return None;
    }
    let value: f64 = suffix.parse().ok()?;
    if value.fract() != 0.0 || value > f64::from(u32::MAX) {
        return None;
    }
    Some(Category::Code(value as u32))
}

fn parse_weekday(suffix: &str) -> Option<Category> {
    parse_weekday_name(suffix).map(Category::Weekday)
}

fn parse_hour(suffix: &str) -> Option<Category> {
    if suffix.is_empty() || suffix.len() > 2 || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hour: u32 = suffix.parse().ok()?;
    (hour < 24).then_some(Category::Hour(hour))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rstest::rstest;

    use super::*;

    fn wednesday_8am() -> TripTimes {
        let pickup = NaiveDate::from_ymd_opt(2024, 1, 17)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap();
        TripTimes::from_pickup(pickup)
    }

    #[rstest]
    #[case("1", Some(Category::Code(1)))]
    #[case("1.0", Some(Category::Code(1)))]
    #[case("99.0", Some(Category::Code(99)))]
    #[case("1.5", None)]
    #[case("-1.0", None)]
    #[case("1e0", None)]
    #[case("", None)]
    #[case("nan", None)]
    fn parses_codes(#[case] suffix: &str, #[case] expected: Option<Category>) {
        assert_eq!(parse_code(suffix), expected);
    }

    #[rstest]
    #[case("0", Some(Category::Hour(0)))]
    #[case("08", Some(Category::Hour(8)))]
    #[case("23", Some(Category::Hour(23)))]
    #[case("24", None)]
    #[case("of_day", None)]
    #[case("+5", None)]
    fn parses_hours(#[case] suffix: &str, #[case] expected: Option<Category>) {
        assert_eq!(parse_hour(suffix), expected);
    }

    #[test]
    fn classify_requires_parsable_suffix() {
        let registry = CategoricalRegistry::standard();

        let (family, category) = registry.classify("RatecodeID_5.0").unwrap();
        assert_eq!(family.id(), FamilyId::RateCode);
        assert_eq!(category, Category::Code(5));

        assert!(registry.classify("hour_of_day").is_none());
        assert!(registry.classify("weekday_Funday").is_none());
        assert!(registry.classify("RatecodeID").is_none());
        assert!(registry.classify("trip_distance").is_none());
    }

    #[test]
    fn indicators_follow_active_category() {
        let registry = CategoricalRegistry::standard();
        let times = wednesday_8am();

        let weekday = registry.family(FamilyId::Weekday).unwrap();
        assert_eq!(weekday.indicator(Category::Weekday(Weekday::Wed), &times), 1.0);
        assert_eq!(weekday.indicator(Category::Weekday(Weekday::Mon), &times), 0.0);

        let hour = registry.family(FamilyId::Hour).unwrap();
        assert_eq!(hour.active(&times), Category::Hour(8));
    }

    #[test]
    fn active_column_names() {
        let registry = CategoricalRegistry::standard();
        let times = wednesday_8am();
        let names: Vec<String> = registry
            .families()
            .iter()
            .map(|f| f.active_column(&times))
            .collect();

        assert_eq!(
            names,
            [
                "RatecodeID_1.0",
                "payment_type_1.0",
                "trip_type_1.0",
                "weekday_Wednesday",
                "hour_8"
            ]
        );
    }

    #[test]
    fn empty_registry_claims_nothing() {
        assert!(CategoricalRegistry::empty().classify("RatecodeID_1.0").is_none());
    }
}
