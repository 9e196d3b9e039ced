use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::validation::ValidationError;

/// Continent buckets used for classification and statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Continent {
    NorthAmerica,
    CentralAmerica,
    SouthAmerica,
    Europe,
    Asia,
    Africa,
    Oceania,
}

impl Continent {
    pub const ALL: [Continent; 7] = [
        Continent::NorthAmerica,
        Continent::CentralAmerica,
        Continent::SouthAmerica,
        Continent::Europe,
        Continent::Asia,
        Continent::Africa,
        Continent::Oceania,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::NorthAmerica => "North America",
            Self::CentralAmerica => "Central America & Caribbean",
            Self::SouthAmerica => "South America",
            Self::Europe => "Europe",
            Self::Asia => "Asia",
            Self::Africa => "Africa",
            Self::Oceania => "Oceania",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NorthAmerica => "north_america",
            Self::CentralAmerica => "central_america",
            Self::SouthAmerica => "south_america",
            Self::Europe => "europe",
            Self::Asia => "asia",
            Self::Africa => "africa",
            Self::Oceania => "oceania",
        }
    }
}

impl fmt::Display for Continent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Continent {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "north_america" => Ok(Self::NorthAmerica),
            "central_america" => Ok(Self::CentralAmerica),
            "south_america" => Ok(Self::SouthAmerica),
            "europe" => Ok(Self::Europe),
            "asia" => Ok(Self::Asia),
            "africa" => Ok(Self::Africa),
            "oceania" => Ok(Self::Oceania),
            other => Err(ValidationError::UnknownContinent(other.to_string())),
        }
    }
}

struct CountryInfo {
    code: &'static str,
    name: &'static str,
    timezone: &'static str,
    continents: &'static [Continent],
}

const fn country(
    code: &'static str,
    name: &'static str,
    timezone: &'static str,
    continents: &'static [Continent],
) -> CountryInfo {
    CountryInfo {
        code,
        name,
        timezone,
        continents,
    }
}

const NORTH_AMERICA: &[Continent] = &[Continent::NorthAmerica];
const CENTRAL_AMERICA: &[Continent] = &[Continent::CentralAmerica];
const SOUTH_AMERICA: &[Continent] = &[Continent::SouthAmerica];
const EUROPE: &[Continent] = &[Continent::Europe];
const ASIA: &[Continent] = &[Continent::Asia];
const AFRICA: &[Continent] = &[Continent::Africa];
const OCEANIA: &[Continent] = &[Continent::Oceania];
const EUROPE_AND_ASIA: &[Continent] = &[Continent::Europe, Continent::Asia];

/// Primary continent for the transcontinental codes. This is a policy table,
/// not a geographic fact: statistics stay stable only if these picks never
/// change.
const PRIMARY_OVERRIDES: &[(&str, Continent)] = &[
    ("AM", Continent::Asia),
    ("AZ", Continent::Asia),
    ("CY", Continent::Europe),
    ("GE", Continent::Asia),
    ("KZ", Continent::Asia),
    ("RU", Continent::Asia),
    ("TR", Continent::Asia),
];

static COUNTRIES: &[CountryInfo] = &[
    // North America
    country("CA", "Canada", "America/Toronto", NORTH_AMERICA),
    country("MX", "Mexico", "America/Mexico_City", NORTH_AMERICA),
    country("US", "United States", "America/New_York", NORTH_AMERICA),
    // Central America & Caribbean
    country("BS", "Bahamas", "America/Nassau", CENTRAL_AMERICA),
    country("BZ", "Belize", "America/Belize", CENTRAL_AMERICA),
    country("CR", "Costa Rica", "America/Costa_Rica", CENTRAL_AMERICA),
    country("CU", "Cuba", "America/Havana", CENTRAL_AMERICA),
    country("DO", "Dominican Republic", "America/Santo_Domingo", CENTRAL_AMERICA),
    country("GT", "Guatemala", "America/Guatemala", CENTRAL_AMERICA),
    country("HN", "Honduras", "America/Tegucigalpa", CENTRAL_AMERICA),
    country("HT", "Haiti", "America/Port-au-Prince", CENTRAL_AMERICA),
    country("JM", "Jamaica", "America/Jamaica", CENTRAL_AMERICA),
    country("NI", "Nicaragua", "America/Managua", CENTRAL_AMERICA),
    country("PA", "Panama", "America/Panama", CENTRAL_AMERICA),
    country("SV", "El Salvador", "America/El_Salvador", CENTRAL_AMERICA),
    country("TT", "Trinidad and Tobago", "America/Port_of_Spain", CENTRAL_AMERICA),
    // South America
    country("AR", "Argentina", "America/Argentina/Buenos_Aires", SOUTH_AMERICA),
    country("BO", "Bolivia", "America/La_Paz", SOUTH_AMERICA),
    country("BR", "Brazil", "America/Sao_Paulo", SOUTH_AMERICA),
    country("CL", "Chile", "America/Santiago", SOUTH_AMERICA),
    country("CO", "Colombia", "America/Bogota", SOUTH_AMERICA),
    country("EC", "Ecuador", "America/Guayaquil", SOUTH_AMERICA),
    country("GY", "Guyana", "America/Guyana", SOUTH_AMERICA),
    country("PE", "Peru", "America/Lima", SOUTH_AMERICA),
    country("PY", "Paraguay", "America/Asuncion", SOUTH_AMERICA),
    country("SR", "Suriname", "America/Paramaribo", SOUTH_AMERICA),
    country("UY", "Uruguay", "America/Montevideo", SOUTH_AMERICA),
    country("VE", "Venezuela", "America/Caracas", SOUTH_AMERICA),
    // Europe
    country("AD", "Andorra", "Europe/Andorra", EUROPE),
    country("AL", "Albania", "Europe/Tirane", EUROPE),
    country("AT", "Austria", "Europe/Vienna", EUROPE),
    country("BA", "Bosnia and Herzegovina", "Europe/Sarajevo", EUROPE),
    country("BE", "Belgium", "Europe/Brussels", EUROPE),
    country("BG", "Bulgaria", "Europe/Sofia", EUROPE),
    country("BY", "Belarus", "Europe/Minsk", EUROPE),
    country("CH", "Switzerland", "Europe/Zurich", EUROPE),
    country("CZ", "Czechia", "Europe/Prague", EUROPE),
    country("DE", "Germany", "Europe/Berlin", EUROPE),
    country("DK", "Denmark", "Europe/Copenhagen", EUROPE),
    country("EE", "Estonia", "Europe/Tallinn", EUROPE),
    country("ES", "Spain", "Europe/Madrid", EUROPE),
    country("FI", "Finland", "Europe/Helsinki", EUROPE),
    country("FR", "France", "Europe/Paris", EUROPE),
    country("GB", "United Kingdom", "Europe/London", EUROPE),
    country("GR", "Greece", "Europe/Athens", EUROPE),
    country("HR", "Croatia", "Europe/Zagreb", EUROPE),
    country("HU", "Hungary", "Europe/Budapest", EUROPE),
    country("IE", "Ireland", "Europe/Dublin", EUROPE),
    country("IS", "Iceland", "Atlantic/Reykjavik", EUROPE),
    country("IT", "Italy", "Europe/Rome", EUROPE),
    country("LI", "Liechtenstein", "Europe/Vaduz", EUROPE),
    country("LT", "Lithuania", "Europe/Vilnius", EUROPE),
    country("LU", "Luxembourg", "Europe/Luxembourg", EUROPE),
    country("LV", "Latvia", "Europe/Riga", EUROPE),
    country("MC", "Monaco", "Europe/Monaco", EUROPE),
    country("MD", "Moldova", "Europe/Chisinau", EUROPE),
    country("ME", "Montenegro", "Europe/Podgorica", EUROPE),
    country("MK", "North Macedonia", "Europe/Skopje", EUROPE),
    country("MT", "Malta", "Europe/Malta", EUROPE),
    country("NL", "Netherlands", "Europe/Amsterdam", EUROPE),
    country("NO", "Norway", "Europe/Oslo", EUROPE),
    country("PL", "Poland", "Europe/Warsaw", EUROPE),
    country("PT", "Portugal", "Europe/Lisbon", EUROPE),
    country("RO", "Romania", "Europe/Bucharest", EUROPE),
    country("RS", "Serbia", "Europe/Belgrade", EUROPE),
    country("SE", "Sweden", "Europe/Stockholm", EUROPE),
    country("SI", "Slovenia", "Europe/Ljubljana", EUROPE),
    country("SK", "Slovakia", "Europe/Bratislava", EUROPE),
    country("SM", "San Marino", "Europe/San_Marino", EUROPE),
    country("UA", "Ukraine", "Europe/Kyiv", EUROPE),
    // Transcontinental, Europe and Asia
    country("AM", "Armenia", "Asia/Yerevan", EUROPE_AND_ASIA),
    country("AZ", "Azerbaijan", "Asia/Baku", EUROPE_AND_ASIA),
    country("CY", "Cyprus", "Asia/Nicosia", EUROPE_AND_ASIA),
    country("GE", "Georgia", "Asia/Tbilisi", EUROPE_AND_ASIA),
    country("KZ", "Kazakhstan", "Asia/Almaty", EUROPE_AND_ASIA),
    country("RU", "Russia", "Europe/Moscow", EUROPE_AND_ASIA),
    country("TR", "Turkey", "Europe/Istanbul", EUROPE_AND_ASIA),
    // Asia
    country("AE", "United Arab Emirates", "Asia/Dubai", ASIA),
    country("AF", "Afghanistan", "Asia/Kabul", ASIA),
    country("BD", "Bangladesh", "Asia/Dhaka", ASIA),
    country("BH", "Bahrain", "Asia/Bahrain", ASIA),
    country("BT", "Bhutan", "Asia/Thimphu", ASIA),
    country("CN", "China", "Asia/Shanghai", ASIA),
    country("ID", "Indonesia", "Asia/Jakarta", ASIA),
    country("IL", "Israel", "Asia/Jerusalem", ASIA),
    country("IN", "India", "Asia/Kolkata", ASIA),
    country("IQ", "Iraq", "Asia/Baghdad", ASIA),
    country("IR", "Iran", "Asia/Tehran", ASIA),
    country("JO", "Jordan", "Asia/Amman", ASIA),
    country("JP", "Japan", "Asia/Tokyo", ASIA),
    country("KG", "Kyrgyzstan", "Asia/Bishkek", ASIA),
    country("KH", "Cambodia", "Asia/Phnom_Penh", ASIA),
    country("KR", "South Korea", "Asia/Seoul", ASIA),
    country("KW", "Kuwait", "Asia/Kuwait", ASIA),
    country("LA", "Laos", "Asia/Vientiane", ASIA),
    country("LB", "Lebanon", "Asia/Beirut", ASIA),
    country("LK", "Sri Lanka", "Asia/Colombo", ASIA),
    country("MM", "Myanmar", "Asia/Yangon", ASIA),
    country("MN", "Mongolia", "Asia/Ulaanbaatar", ASIA),
    country("MY", "Malaysia", "Asia/Kuala_Lumpur", ASIA),
    country("NP", "Nepal", "Asia/Kathmandu", ASIA),
    country("OM", "Oman", "Asia/Muscat", ASIA),
    country("PH", "Philippines", "Asia/Manila", ASIA),
    country("PK", "Pakistan", "Asia/Karachi", ASIA),
    country("QA", "Qatar", "Asia/Qatar", ASIA),
    country("SA", "Saudi Arabia", "Asia/Riyadh", ASIA),
    country("SG", "Singapore", "Asia/Singapore", ASIA),
    country("SY", "Syria", "Asia/Damascus", ASIA),
    country("TH", "Thailand", "Asia/Bangkok", ASIA),
    country("TJ", "Tajikistan", "Asia/Dushanbe", ASIA),
    country("TW", "Taiwan", "Asia/Taipei", ASIA),
    country("UZ", "Uzbekistan", "Asia/Tashkent", ASIA),
    country("VN", "Vietnam", "Asia/Ho_Chi_Minh", ASIA),
    country("YE", "Yemen", "Asia/Aden", ASIA),
    // Africa
    country("AO", "Angola", "Africa/Luanda", AFRICA),
    country("BF", "Burkina Faso", "Africa/Ouagadougou", AFRICA),
    country("BJ", "Benin", "Africa/Porto-Novo", AFRICA),
    country("BW", "Botswana", "Africa/Gaborone", AFRICA),
    country("CD", "Democratic Republic of the Congo", "Africa/Kinshasa", AFRICA),
    country("CG", "Republic of the Congo", "Africa/Brazzaville", AFRICA),
    country("CI", "Ivory Coast", "Africa/Abidjan", AFRICA),
    country("CM", "Cameroon", "Africa/Douala", AFRICA),
    country("DJ", "Djibouti", "Africa/Djibouti", AFRICA),
    country("DZ", "Algeria", "Africa/Algiers", AFRICA),
    country("EG", "Egypt", "Africa/Cairo", AFRICA),
    country("ET", "Ethiopia", "Africa/Addis_Ababa", AFRICA),
    country("GH", "Ghana", "Africa/Accra", AFRICA),
    country("KE", "Kenya", "Africa/Nairobi", AFRICA),
    country("LY", "Libya", "Africa/Tripoli", AFRICA),
    country("MA", "Morocco", "Africa/Casablanca", AFRICA),
    country("MG", "Madagascar", "Indian/Antananarivo", AFRICA),
    country("ML", "Mali", "Africa/Bamako", AFRICA),
    country("MU", "Mauritius", "Indian/Mauritius", AFRICA),
    country("MW", "Malawi", "Africa/Blantyre", AFRICA),
    country("MZ", "Mozambique", "Africa/Maputo", AFRICA),
    country("NA", "Namibia", "Africa/Windhoek", AFRICA),
    country("NE", "Niger", "Africa/Niamey", AFRICA),
    country("NG", "Nigeria", "Africa/Lagos", AFRICA),
    country("RW", "Rwanda", "Africa/Kigali", AFRICA),
    country("SD", "Sudan", "Africa/Khartoum", AFRICA),
    country("SN", "Senegal", "Africa/Dakar", AFRICA),
    country("SO", "Somalia", "Africa/Mogadishu", AFRICA),
    country("TG", "Togo", "Africa/Lome", AFRICA),
    country("TN", "Tunisia", "Africa/Tunis", AFRICA),
    country("TZ", "Tanzania", "Africa/Dar_es_Salaam", AFRICA),
    country("UG", "Uganda", "Africa/Kampala", AFRICA),
    country("ZA", "South Africa", "Africa/Johannesburg", AFRICA),
    country("ZM", "Zambia", "Africa/Lusaka", AFRICA),
    country("ZW", "Zimbabwe", "Africa/Harare", AFRICA),
    // Oceania
    country("AU", "Australia", "Australia/Sydney", OCEANIA),
    country("FJ", "Fiji", "Pacific/Fiji", OCEANIA),
    country("NZ", "New Zealand", "Pacific/Auckland", OCEANIA),
    country("PG", "Papua New Guinea", "Pacific/Port_Moresby", OCEANIA),
    country("TO", "Tonga", "Pacific/Tongatapu", OCEANIA),
    country("WS", "Samoa", "Pacific/Apia", OCEANIA),
];

static BY_CODE: Lazy<HashMap<&'static str, &'static CountryInfo>> = Lazy::new(|| {
    COUNTRIES
        .iter()
        .map(|info| (info.code, info))
        .collect()
});

const REGIONAL_INDICATOR_BASE: u32 = 0x1F1E6;

/// An ISO 3166-1 alpha-2 country code from the supported set.
///
/// Lookup data (display name, timezone hint, continent membership) comes from
/// a fixed table; codes outside the table are rejected at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CountryCode(String);

impl CountryCode {
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let normalized = value.into().trim().to_uppercase();

        if normalized.len() != 2 || !normalized.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(ValidationError::CountryCodeNotTwoLetters);
        }

        if !BY_CODE.contains_key(normalized.as_str()) {
            return Err(ValidationError::UnknownCountryCode(normalized));
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn country_name(&self) -> &'static str {
        self.info().name
    }

    /// Representative IANA timezone for the country.
    pub fn timezone(&self) -> &'static str {
        self.info().timezone
    }

    pub fn continents(&self) -> &'static [Continent] {
        self.info().continents
    }

    pub fn is_transcontinental(&self) -> bool {
        self.info().continents.len() > 1
    }

    pub fn is_in(&self, continent: Continent) -> bool {
        self.info().continents.contains(&continent)
    }

    pub fn is_north_america(&self) -> bool {
        self.is_in(Continent::NorthAmerica)
    }

    pub fn is_central_america(&self) -> bool {
        self.is_in(Continent::CentralAmerica)
    }

    pub fn is_south_america(&self) -> bool {
        self.is_in(Continent::SouthAmerica)
    }

    pub fn is_europe(&self) -> bool {
        self.is_in(Continent::Europe)
    }

    pub fn is_asia(&self) -> bool {
        self.is_in(Continent::Asia)
    }

    pub fn is_africa(&self) -> bool {
        self.is_in(Continent::Africa)
    }

    pub fn is_oceania(&self) -> bool {
        self.is_in(Continent::Oceania)
    }

    /// Single continent used for statistics. Transcontinental codes resolve
    /// through the override table; everything else has exactly one membership.
    pub fn primary_continent(&self) -> Continent {
        PRIMARY_OVERRIDES
            .iter()
            .find(|(code, _)| *code == self.0)
            .map(|(_, continent)| *continent)
            .unwrap_or_else(|| self.info().continents[0])
    }

    /// Flag emoji built from the two regional-indicator code points.
    pub fn flag(&self) -> String {
        self.0
            .chars()
            .filter_map(|c| char::from_u32(REGIONAL_INDICATOR_BASE + (c as u32 - 'A' as u32)))
            .collect()
    }

    /// All supported codes whose primary continent is `continent`, in table
    /// order. SQL adapters use this to push continent filters down to the
    /// engine without re-stating the override policy.
    pub fn codes_with_primary(continent: Continent) -> Vec<&'static str> {
        COUNTRIES
            .iter()
            .filter(|info| {
                PRIMARY_OVERRIDES
                    .iter()
                    .find(|(code, _)| *code == info.code)
                    .map(|(_, primary)| *primary)
                    .unwrap_or(info.continents[0])
                    == continent
            })
            .map(|info| info.code)
            .collect()
    }

    fn info(&self) -> &'static CountryInfo {
        BY_CODE
            .get(self.0.as_str())
            .copied()
            .expect("validated code is present in the country table")
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for CountryCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CountryCode> for String {
    fn from(value: CountryCode) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalizes_case_and_whitespace() {
        let code = CountryCode::new(" us ").unwrap();
        assert_eq!(code.as_str(), "US");
        assert_eq!(code.country_name(), "United States");
    }

    #[test]
    fn test_rejects_wrong_shapes() {
        for candidate in ["", "U", "USA", "U1", "1A", "ÜS"] {
            assert_eq!(
                CountryCode::new(candidate),
                Err(ValidationError::CountryCodeNotTwoLetters),
                "accepted {candidate:?}"
            );
        }
    }

    #[test]
    fn test_rejects_unsupported_code() {
        assert_eq!(
            CountryCode::new("XX"),
            Err(ValidationError::UnknownCountryCode("XX".to_string()))
        );
    }

    #[test]
    fn test_single_membership_primary_continent() {
        assert_eq!(
            CountryCode::new("BR").unwrap().primary_continent(),
            Continent::SouthAmerica
        );
        assert_eq!(
            CountryCode::new("JP").unwrap().primary_continent(),
            Continent::Asia
        );
        assert_eq!(
            CountryCode::new("NG").unwrap().primary_continent(),
            Continent::Africa
        );
        assert_eq!(
            CountryCode::new("AU").unwrap().primary_continent(),
            Continent::Oceania
        );
    }

    #[test]
    fn test_transcontinental_set_is_exactly_seven() {
        let transcontinental: Vec<&str> = COUNTRIES
            .iter()
            .filter(|info| info.continents.len() > 1)
            .map(|info| info.code)
            .collect();
        assert_eq!(
            transcontinental,
            vec!["AM", "AZ", "CY", "GE", "KZ", "RU", "TR"]
        );
    }

    #[test]
    fn test_transcontinental_codes_are_in_both_continents() {
        for code in ["AM", "AZ", "CY", "GE", "KZ", "RU", "TR"] {
            let country = CountryCode::new(code).unwrap();
            assert!(country.is_transcontinental());
            assert!(country.is_europe(), "{code} should be European");
            assert!(country.is_asia(), "{code} should be Asian");
        }
    }

    #[test]
    fn test_override_table_resolves_primary_continent() {
        for code in ["RU", "TR", "KZ", "AZ", "AM", "GE"] {
            assert_eq!(
                CountryCode::new(code).unwrap().primary_continent(),
                Continent::Asia,
                "{code} primary should be Asia"
            );
        }
        assert_eq!(
            CountryCode::new("CY").unwrap().primary_continent(),
            Continent::Europe
        );
    }

    #[test]
    fn test_russia_is_european_but_primarily_asian() {
        let russia = CountryCode::new("RU").unwrap();
        assert!(russia.is_europe());
        assert_eq!(russia.primary_continent(), Continent::Asia);
    }

    #[test]
    fn test_every_override_entry_is_a_transcontinental_country() {
        for (code, _) in PRIMARY_OVERRIDES {
            let info = BY_CODE.get(code).copied();
            assert!(
                info.is_some_and(|info| info.continents.len() > 1),
                "{code} is in the override table but not transcontinental"
            );
        }
    }

    #[test]
    fn test_codes_with_primary_respects_overrides() {
        let europe = CountryCode::codes_with_primary(Continent::Europe);
        assert!(europe.contains(&"DE"));
        assert!(europe.contains(&"CY"));
        assert!(!europe.contains(&"RU"));

        let asia = CountryCode::codes_with_primary(Continent::Asia);
        assert!(asia.contains(&"JP"));
        assert!(asia.contains(&"RU"));
        assert!(asia.contains(&"TR"));
        assert!(!asia.contains(&"CY"));
    }

    #[test]
    fn test_codes_with_primary_partitions_the_table() {
        let total: usize = Continent::ALL
            .iter()
            .map(|continent| CountryCode::codes_with_primary(*continent).len())
            .sum();
        assert_eq!(total, COUNTRIES.len());
    }

    #[test]
    fn test_flag_uses_regional_indicators() {
        assert_eq!(CountryCode::new("US").unwrap().flag(), "\u{1F1FA}\u{1F1F8}");
        assert_eq!(CountryCode::new("BR").unwrap().flag(), "🇧🇷");
    }

    #[test]
    fn test_timezone_hints() {
        assert_eq!(CountryCode::new("RU").unwrap().timezone(), "Europe/Moscow");
        assert_eq!(CountryCode::new("JP").unwrap().timezone(), "Asia/Tokyo");
        assert_eq!(CountryCode::new("CY").unwrap().timezone(), "Asia/Nicosia");
    }

    #[test]
    fn test_table_has_no_duplicate_codes() {
        assert_eq!(BY_CODE.len(), COUNTRIES.len());
    }

    #[test]
    fn test_continent_parse_round_trip() {
        for continent in Continent::ALL {
            assert_eq!(
                continent.as_str().parse::<Continent>().unwrap(),
                continent
            );
        }
        assert_eq!(
            "atlantis".parse::<Continent>(),
            Err(ValidationError::UnknownContinent("atlantis".to_string()))
        );
    }

    #[test]
    fn test_serde_round_trip_validates() {
        let code: CountryCode = serde_json::from_str("\"br\"").unwrap();
        assert_eq!(code.as_str(), "BR");
        assert!(serde_json::from_str::<CountryCode>("\"ZZ\"").is_err());
    }
}
