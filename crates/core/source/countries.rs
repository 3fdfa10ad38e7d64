//! Country metadata: ISO 3166-1 alpha-2 codes, short names and continents.

use crate::error::{Result, TravelRegionsError};
use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Continent codes as used by region filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Continent {
    #[serde(rename = "AF")]
    Africa,
    #[serde(rename = "AN")]
    Antarctica,
    #[serde(rename = "AS")]
    Asia,
    #[serde(rename = "EU")]
    Europe,
    #[serde(rename = "NA")]
    NorthAmerica,
    #[serde(rename = "OC")]
    Oceania,
    #[serde(rename = "SA")]
    SouthAmerica,
}

impl Continent {
    pub const ALL: [Continent; 7] = [
        Continent::Africa,
        Continent::Antarctica,
        Continent::Asia,
        Continent::Europe,
        Continent::NorthAmerica,
        Continent::Oceania,
        Continent::SouthAmerica,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Continent::Africa => "AF",
            Continent::Antarctica => "AN",
            Continent::Asia => "AS",
            Continent::Europe => "EU",
            Continent::NorthAmerica => "NA",
            Continent::Oceania => "OC",
            Continent::SouthAmerica => "SA",
        }
    }
}

impl fmt::Display for Continent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Continent {
    type Err = TravelRegionsError;

    fn from_str(s: &str) -> Result<Self> {
        let code = s.trim().to_ascii_uppercase();
        Continent::ALL
            .into_iter()
            .find(|continent| continent.code() == code)
            .ok_or_else(|| {
                TravelRegionsError::InvalidInput(format!(
                    "Unknown continent code '{}', expected one of SA, NA, EU, AS, AF, OC, AN",
                    s
                ))
            })
    }
}

/// Jurisdictions the default table has no continent for.
pub const CONTINENT_OVERRIDES: [(&str, Continent); 3] = [
    ("EH", Continent::Africa),
    ("VA", Continent::Europe),
    ("PN", Continent::Oceania),
];

/// Country code, name and continent resolution.
///
/// Implementations must be shareable across query threads.
pub trait CountryCatalog: Send + Sync {
    /// Short name for an alpha-2 code.
    fn name(&self, code: &str) -> Option<&str>;

    /// Alpha-2 code for a short name.
    fn code(&self, name: &str) -> Option<&str>;

    /// Continent of an alpha-2 code, without overrides.
    fn continent(&self, code: &str) -> Option<Continent>;
}

/// Continent of an alpha-2 code, falling back to [`CONTINENT_OVERRIDES`].
pub fn resolve_continent(catalog: &dyn CountryCatalog, code: &str) -> Result<Continent> {
    let code = code.trim().to_ascii_uppercase();
    catalog
        .continent(&code)
        .or_else(|| {
            CONTINENT_OVERRIDES
                .iter()
                .find(|(override_code, _)| *override_code == code)
                .map(|(_, continent)| *continent)
        })
        .ok_or(TravelRegionsError::UnknownCountry(code))
}

/// Continent of a country given by short name.
pub fn resolve_continent_by_name(catalog: &dyn CountryCatalog, name: &str) -> Result<Continent> {
    let code = catalog
        .code(name)
        .ok_or_else(|| TravelRegionsError::UnknownCountry(name.to_string()))?;
    resolve_continent(catalog, code)
}

use Continent::{
    Africa as AF, Antarctica as AN, Asia as AS, Europe as EU, NorthAmerica as NA, Oceania as OC,
    SouthAmerica as SA,
};

/// `(alpha-2, short name, continent)`.
static COUNTRIES: &[(&str, &str, Option<Continent>)] = &[
    ("AD", "Andorra", Some(EU)),
    ("AE", "United Arab Emirates", Some(AS)),
    ("AF", "Afghanistan", Some(AS)),
    ("AG", "Antigua and Barbuda", Some(NA)),
    ("AI", "Anguilla", Some(NA)),
    ("AL", "Albania", Some(EU)),
    ("AM", "Armenia", Some(AS)),
    ("AO", "Angola", Some(AF)),
    ("AQ", "Antarctica", Some(AN)),
    ("AR", "Argentina", Some(SA)),
    ("AS", "American Samoa", Some(OC)),
    ("AT", "Austria", Some(EU)),
    ("AU", "Australia", Some(OC)),
    ("AW", "Aruba", Some(NA)),
    ("AX", "Åland Islands", Some(EU)),
    ("AZ", "Azerbaijan", Some(AS)),
    ("BA", "Bosnia and Herzegovina", Some(EU)),
    ("BB", "Barbados", Some(NA)),
    ("BD", "Bangladesh", Some(AS)),
    ("BE", "Belgium", Some(EU)),
    ("BF", "Burkina Faso", Some(AF)),
    ("BG", "Bulgaria", Some(EU)),
    ("BH", "Bahrain", Some(AS)),
    ("BI", "Burundi", Some(AF)),
    ("BJ", "Benin", Some(AF)),
    ("BL", "Saint Barthélemy", Some(NA)),
    ("BM", "Bermuda", Some(NA)),
    ("BN", "Brunei Darussalam", Some(AS)),
    ("BO", "Bolivia, Plurinational State of", Some(SA)),
    ("BQ", "Bonaire, Sint Eustatius and Saba", Some(NA)),
    ("BR", "Brazil", Some(SA)),
    ("BS", "Bahamas", Some(NA)),
    ("BT", "Bhutan", Some(AS)),
    ("BV", "Bouvet Island", Some(AN)),
    ("BW", "Botswana", Some(AF)),
    ("BY", "Belarus", Some(EU)),
    ("BZ", "Belize", Some(NA)),
    ("CA", "Canada", Some(NA)),
    ("CC", "Cocos (Keeling) Islands", Some(AS)),
    ("CD", "Congo, The Democratic Republic of the", Some(AF)),
    ("CF", "Central African Republic", Some(AF)),
    ("CG", "Congo", Some(AF)),
    ("CH", "Switzerland", Some(EU)),
    ("CI", "Côte d'Ivoire", Some(AF)),
    ("CK", "Cook Islands", Some(OC)),
    ("CL", "Chile", Some(SA)),
    ("CM", "Cameroon", Some(AF)),
    ("CN", "China", Some(AS)),
    ("CO", "Colombia", Some(SA)),
    ("CR", "Costa Rica", Some(NA)),
    ("CU", "Cuba", Some(NA)),
    ("CV", "Cabo Verde", Some(AF)),
    ("CW", "Curaçao", Some(NA)),
    ("CX", "Christmas Island", Some(AS)),
    ("CY", "Cyprus", Some(AS)),
    ("CZ", "Czechia", Some(EU)),
    ("DE", "Germany", Some(EU)),
    ("DJ", "Djibouti", Some(AF)),
    ("DK", "Denmark", Some(EU)),
    ("DM", "Dominica", Some(NA)),
    ("DO", "Dominican Republic", Some(NA)),
    ("DZ", "Algeria", Some(AF)),
    ("EC", "Ecuador", Some(SA)),
    ("EE", "Estonia", Some(EU)),
    ("EG", "Egypt", Some(AF)),
    ("EH", "Western Sahara", None),
    ("ER", "Eritrea", Some(AF)),
    ("ES", "Spain", Some(EU)),
    ("ET", "Ethiopia", Some(AF)),
    ("FI", "Finland", Some(EU)),
    ("FJ", "Fiji", Some(OC)),
    ("FK", "Falkland Islands (Malvinas)", Some(SA)),
    ("FM", "Micronesia, Federated States of", Some(OC)),
    ("FO", "Faroe Islands", Some(EU)),
    ("FR", "France", Some(EU)),
    ("GA", "Gabon", Some(AF)),
    ("GB", "United Kingdom", Some(EU)),
    ("GD", "Grenada", Some(NA)),
    ("GE", "Georgia", Some(AS)),
    ("GF", "French Guiana", Some(SA)),
    ("GG", "Guernsey", Some(EU)),
    ("GH", "Ghana", Some(AF)),
    ("GI", "Gibraltar", Some(EU)),
    ("GL", "Greenland", Some(NA)),
    ("GM", "Gambia", Some(AF)),
    ("GN", "Guinea", Some(AF)),
    ("GP", "Guadeloupe", Some(NA)),
    ("GQ", "Equatorial Guinea", Some(AF)),
    ("GR", "Greece", Some(EU)),
    ("GS", "South Georgia and the South Sandwich Islands", Some(AN)),
    ("GT", "Guatemala", Some(NA)),
    ("GU", "Guam", Some(OC)),
    ("GW", "Guinea-Bissau", Some(AF)),
    ("GY", "Guyana", Some(SA)),
    ("HK", "Hong Kong", Some(AS)),
    ("HM", "Heard Island and McDonald Islands", Some(AN)),
    ("HN", "Honduras", Some(NA)),
    ("HR", "Croatia", Some(EU)),
    ("HT", "Haiti", Some(NA)),
    ("HU", "Hungary", Some(EU)),
    ("ID", "Indonesia", Some(AS)),
    ("IE", "Ireland", Some(EU)),
    ("IL", "Israel", Some(AS)),
    ("IM", "Isle of Man", Some(EU)),
    ("IN", "India", Some(AS)),
    ("IO", "British Indian Ocean Territory", Some(AS)),
    ("IQ", "Iraq", Some(AS)),
    ("IR", "Iran, Islamic Republic of", Some(AS)),
    ("IS", "Iceland", Some(EU)),
    ("IT", "Italy", Some(EU)),
    ("JE", "Jersey", Some(EU)),
    ("JM", "Jamaica", Some(NA)),
    ("JO", "Jordan", Some(AS)),
    ("JP", "Japan", Some(AS)),
    ("KE", "Kenya", Some(AF)),
    ("KG", "Kyrgyzstan", Some(AS)),
    ("KH", "Cambodia", Some(AS)),
    ("KI", "Kiribati", Some(OC)),
    ("KM", "Comoros", Some(AF)),
    ("KN", "Saint Kitts and Nevis", Some(NA)),
    ("KP", "Korea, Democratic People's Republic of", Some(AS)),
    ("KR", "Korea, Republic of", Some(AS)),
    ("KW", "Kuwait", Some(AS)),
    ("KY", "Cayman Islands", Some(NA)),
    ("KZ", "Kazakhstan", Some(AS)),
    ("LA", "Lao People's Democratic Republic", Some(AS)),
    ("LB", "Lebanon", Some(AS)),
    ("LC", "Saint Lucia", Some(NA)),
    ("LI", "Liechtenstein", Some(EU)),
    ("LK", "Sri Lanka", Some(AS)),
    ("LR", "Liberia", Some(AF)),
    ("LS", "Lesotho", Some(AF)),
    ("LT", "Lithuania", Some(EU)),
    ("LU", "Luxembourg", Some(EU)),
    ("LV", "Latvia", Some(EU)),
    ("LY", "Libya", Some(AF)),
    ("MA", "Morocco", Some(AF)),
    ("MC", "Monaco", Some(EU)),
    ("MD", "Moldova, Republic of", Some(EU)),
    ("ME", "Montenegro", Some(EU)),
    ("MF", "Saint Martin (French part)", Some(NA)),
    ("MG", "Madagascar", Some(AF)),
    ("MH", "Marshall Islands", Some(OC)),
    ("MK", "North Macedonia", Some(EU)),
    ("ML", "Mali", Some(AF)),
    ("MM", "Myanmar", Some(AS)),
    ("MN", "Mongolia", Some(AS)),
    ("MO", "Macao", Some(AS)),
    ("MP", "Northern Mariana Islands", Some(OC)),
    ("MQ", "Martinique", Some(NA)),
    ("MR", "Mauritania", Some(AF)),
    ("MS", "Montserrat", Some(NA)),
    ("MT", "Malta", Some(EU)),
    ("MU", "Mauritius", Some(AF)),
    ("MV", "Maldives", Some(AS)),
    ("MW", "Malawi", Some(AF)),
    ("MX", "Mexico", Some(NA)),
    ("MY", "Malaysia", Some(AS)),
    ("MZ", "Mozambique", Some(AF)),
    ("NA", "Namibia", Some(AF)),
    ("NC", "New Caledonia", Some(OC)),
    ("NE", "Niger", Some(AF)),
    ("NF", "Norfolk Island", Some(OC)),
    ("NG", "Nigeria", Some(AF)),
    ("NI", "Nicaragua", Some(NA)),
    ("NL", "Netherlands", Some(EU)),
    ("NO", "Norway", Some(EU)),
    ("NP", "Nepal", Some(AS)),
    ("NR", "Nauru", Some(OC)),
    ("NU", "Niue", Some(OC)),
    ("NZ", "New Zealand", Some(OC)),
    ("OM", "Oman", Some(AS)),
    ("PA", "Panama", Some(NA)),
    ("PE", "Peru", Some(SA)),
    ("PF", "French Polynesia", Some(OC)),
    ("PG", "Papua New Guinea", Some(OC)),
    ("PH", "Philippines", Some(AS)),
    ("PK", "Pakistan", Some(AS)),
    ("PL", "Poland", Some(EU)),
    ("PM", "Saint Pierre and Miquelon", Some(NA)),
    ("PN", "Pitcairn", None),
    ("PR", "Puerto Rico", Some(NA)),
    ("PS", "Palestine, State of", Some(AS)),
    ("PT", "Portugal", Some(EU)),
    ("PW", "Palau", Some(OC)),
    ("PY", "Paraguay", Some(SA)),
    ("QA", "Qatar", Some(AS)),
    ("RE", "Réunion", Some(AF)),
    ("RO", "Romania", Some(EU)),
    ("RS", "Serbia", Some(EU)),
    ("RU", "Russian Federation", Some(EU)),
    ("RW", "Rwanda", Some(AF)),
    ("SA", "Saudi Arabia", Some(AS)),
    ("SB", "Solomon Islands", Some(OC)),
    ("SC", "Seychelles", Some(AF)),
    ("SD", "Sudan", Some(AF)),
    ("SE", "Sweden", Some(EU)),
    ("SG", "Singapore", Some(AS)),
    ("SH", "Saint Helena, Ascension and Tristan da Cunha", Some(AF)),
    ("SI", "Slovenia", Some(EU)),
    ("SJ", "Svalbard and Jan Mayen", Some(EU)),
    ("SK", "Slovakia", Some(EU)),
    ("SL", "Sierra Leone", Some(AF)),
    ("SM", "San Marino", Some(EU)),
    ("SN", "Senegal", Some(AF)),
    ("SO", "Somalia", Some(AF)),
    ("SR", "Suriname", Some(SA)),
    ("SS", "South Sudan", Some(AF)),
    ("ST", "Sao Tome and Principe", Some(AF)),
    ("SV", "El Salvador", Some(NA)),
    ("SX", "Sint Maarten (Dutch part)", Some(NA)),
    ("SY", "Syrian Arab Republic", Some(AS)),
    ("SZ", "Eswatini", Some(AF)),
    ("TC", "Turks and Caicos Islands", Some(NA)),
    ("TD", "Chad", Some(AF)),
    ("TF", "French Southern Territories", Some(AN)),
    ("TG", "Togo", Some(AF)),
    ("TH", "Thailand", Some(AS)),
    ("TJ", "Tajikistan", Some(AS)),
    ("TK", "Tokelau", Some(OC)),
    ("TL", "Timor-Leste", Some(AS)),
    ("TM", "Turkmenistan", Some(AS)),
    ("TN", "Tunisia", Some(AF)),
    ("TO", "Tonga", Some(OC)),
    ("TR", "Türkiye", Some(AS)),
    ("TT", "Trinidad and Tobago", Some(NA)),
    ("TV", "Tuvalu", Some(OC)),
    ("TW", "Taiwan, Province of China", Some(AS)),
    ("TZ", "Tanzania, United Republic of", Some(AF)),
    ("UA", "Ukraine", Some(EU)),
    ("UG", "Uganda", Some(AF)),
    ("UM", "United States Minor Outlying Islands", Some(OC)),
    ("US", "United States", Some(NA)),
    ("UY", "Uruguay", Some(SA)),
    ("UZ", "Uzbekistan", Some(AS)),
    ("VA", "Holy See (Vatican City State)", None),
    ("VC", "Saint Vincent and the Grenadines", Some(NA)),
    ("VE", "Venezuela, Bolivarian Republic of", Some(SA)),
    ("VG", "Virgin Islands, British", Some(NA)),
    ("VI", "Virgin Islands, U.S.", Some(NA)),
    ("VN", "Viet Nam", Some(AS)),
    ("VU", "Vanuatu", Some(OC)),
    ("WF", "Wallis and Futuna", Some(OC)),
    ("WS", "Samoa", Some(OC)),
    ("YE", "Yemen", Some(AS)),
    ("YT", "Mayotte", Some(AF)),
    ("ZA", "South Africa", Some(AF)),
    ("ZM", "Zambia", Some(AF)),
    ("ZW", "Zimbabwe", Some(AF)),
];

struct CountryIndex {
    by_code: FxHashMap<&'static str, (&'static str, Option<Continent>)>,
    by_name: FxHashMap<String, &'static str>,
}

static INDEX: Lazy<CountryIndex> = Lazy::new(|| {
    let mut by_code = FxHashMap::default();
    let mut by_name = FxHashMap::default();
    for &(code, name, continent) in COUNTRIES {
        by_code.insert(code, (name, continent));
        by_name.insert(name.to_lowercase(), code);
    }
    CountryIndex { by_code, by_name }
});

/// Built-in ISO 3166-1 table.
///
/// Western Sahara, Vatican City and Pitcairn carry no continent here; they
/// resolve through [`CONTINENT_OVERRIDES`].
#[derive(Debug, Clone, Copy, Default)]
pub struct IsoCountries;

impl CountryCatalog for IsoCountries {
    fn name(&self, code: &str) -> Option<&str> {
        INDEX
            .by_code
            .get(code.trim().to_ascii_uppercase().as_str())
            .map(|(name, _)| *name)
    }

    fn code(&self, name: &str) -> Option<&str> {
        INDEX.by_name.get(&name.trim().to_lowercase()).copied()
    }

    fn continent(&self, code: &str) -> Option<Continent> {
        INDEX
            .by_code
            .get(code.trim().to_ascii_uppercase().as_str())
            .and_then(|(_, continent)| *continent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_code_and_name() {
        let catalog = IsoCountries;
        assert_eq!(catalog.name("de"), Some("Germany"));
        assert_eq!(catalog.code("germany"), Some("DE"));
        assert_eq!(catalog.continent("US"), Some(Continent::NorthAmerica));
        assert_eq!(catalog.name("XX"), None);
    }

    #[test]
    fn test_overrides_fill_missing_continents() {
        let catalog = IsoCountries;
        for (code, expected) in CONTINENT_OVERRIDES {
            assert_eq!(catalog.continent(code), None);
            assert_eq!(resolve_continent(&catalog, code).unwrap(), expected);
        }
        assert_eq!(
            resolve_continent_by_name(&catalog, "Western Sahara").unwrap(),
            Continent::Africa
        );
    }

    #[test]
    fn test_unknown_country_is_reported() {
        let catalog = IsoCountries;
        assert!(matches!(
            resolve_continent(&catalog, "XX"),
            Err(TravelRegionsError::UnknownCountry(code)) if code == "XX"
        ));
        assert!(resolve_continent_by_name(&catalog, "Atlantis").is_err());
    }

    #[test]
    fn test_continent_codes() {
        assert_eq!("eu".parse::<Continent>().unwrap(), Continent::Europe);
        assert_eq!(Continent::SouthAmerica.to_string(), "SA");
        assert!("XY".parse::<Continent>().is_err());
    }

    #[test]
    fn test_table_codes_are_unique() {
        assert_eq!(INDEX.by_code.len(), COUNTRIES.len());
    }
}
