//! Static country → city reference data backing the location pickers.

use crate::model::{City, Country};

const SEED: &[(&str, &str, &[&str])] = &[
    (
        "United States",
        "US",
        &["New York", "Los Angeles", "Chicago", "Houston", "Miami"],
    ),
    (
        "United Kingdom",
        "UK",
        &["London", "Manchester", "Birmingham", "Glasgow", "Liverpool"],
    ),
    ("Japan", "JP", &["Tokyo", "Osaka", "Kyoto", "Sapporo", "Yokohama"]),
    (
        "Australia",
        "AU",
        &["Sydney", "Melbourne", "Brisbane", "Perth", "Adelaide"],
    ),
    (
        "Germany",
        "DE",
        &["Berlin", "Munich", "Hamburg", "Frankfurt", "Cologne"],
    ),
    (
        "Indonesia",
        "ID",
        &[
            "Jakarta",
            "Surabaya",
            "Bandung",
            "Medan",
            "Makassar",
            "Semarang",
            "Palembang",
            "Tangerang",
            "Depok",
            "Yogyakarta",
        ],
    ),
];

#[derive(Debug, Clone)]
struct CountryEntry {
    country: Country,
    cities: Vec<City>,
}

/// Read-only directory of countries and their cities, in seed order.
#[derive(Debug, Clone)]
pub struct CountryDirectory {
    entries: Vec<CountryEntry>,
}

impl CountryDirectory {
    /// Directory populated with the built-in seed list.
    pub fn seeded() -> Self {
        let entries = SEED
            .iter()
            .map(|(name, code, cities)| CountryEntry {
                country: Country {
                    name: (*name).to_string(),
                    code: (*code).to_string(),
                },
                cities: cities
                    .iter()
                    .map(|city| City {
                        name: (*city).to_string(),
                        country_code: (*code).to_string(),
                    })
                    .collect(),
            })
            .collect();

        Self { entries }
    }

    pub fn countries(&self) -> impl Iterator<Item = &Country> {
        self.entries.iter().map(|e| &e.country)
    }

    /// Case-insensitive exact match on the country code.
    pub fn country_by_code(&self, code: &str) -> Option<&Country> {
        self.entry(code).map(|e| &e.country)
    }

    /// Cities of the country with `code`; empty if the code is unknown.
    pub fn cities_for_country(&self, code: &str) -> &[City] {
        self.entry(code).map(|e| e.cities.as_slice()).unwrap_or(&[])
    }

    fn entry(&self, code: &str) -> Option<&CountryEntry> {
        self.entries
            .iter()
            .find(|e| e.country.code.eq_ignore_ascii_case(code))
    }
}

impl Default for CountryDirectory {
    fn default() -> Self {
        Self::seeded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_countries_in_seed_order() {
        let dir = CountryDirectory::seeded();
        let codes: Vec<&str> = dir.countries().map(|c| c.code.as_str()).collect();

        assert_eq!(codes, ["US", "UK", "JP", "AU", "DE", "ID"]);

        let us = dir.countries().next().unwrap();
        assert_eq!(us.name, "United States");
    }

    #[test]
    fn cities_for_known_country() {
        let dir = CountryDirectory::seeded();
        let cities = dir.cities_for_country("US");

        assert_eq!(cities.len(), 5);
        assert_eq!(cities[0].name, "New York");
        assert!(cities.iter().any(|c| c.name == "Los Angeles"));
        assert!(cities.iter().all(|c| c.country_code == "US"));
        assert_eq!(dir.cities_for_country("ID").len(), 10);
    }

    #[test]
    fn country_code_match_ignores_case() {
        let dir = CountryDirectory::seeded();

        assert_eq!(dir.cities_for_country("jp"), dir.cities_for_country("JP"));
        assert_eq!(dir.country_by_code("de").map(|c| c.name.as_str()), Some("Germany"));
    }

    #[test]
    fn unknown_country_yields_no_cities() {
        let dir = CountryDirectory::seeded();

        assert!(dir.cities_for_country("FR").is_empty());
        assert!(dir.cities_for_country("").is_empty());
        assert!(dir.country_by_code("USA").is_none());
    }
}
