//! Canonical output schema and the alias table used to recognize input columns
//!
//! The alias table is compiled in. Each field's aliases are listed in
//! precedence order: when several of them appear in an input file, the one
//! declared first here wins.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the seven standardized output columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    CommunityName,
    Street,
    City,
    State,
    ZipCode,
    Units,
    OwnershipGroupName,
}

const COMMUNITY_NAME_ALIASES: &[&str] = &[
    "community_name",
    "community",
    "property_name",
    "property name",
    "property",
    "name",
    "asset_name",
    "asset name",
    "project_name",
    "project name",
    "complex_name",
    "complex name",
    "apartment_name",
    "apartment name",
    "building_name",
    "building name",
    "community name",
];

const STREET_ALIASES: &[&str] = &[
    "street",
    "address",
    "street_address",
    "street address",
    "address_1",
    "address1",
    "address 1",
    "property_address",
    "property address",
    "location",
    "street_name",
    "street name",
];

const CITY_ALIASES: &[&str] = &["city", "city_name", "city name", "municipality"];

const STATE_ALIASES: &[&str] = &["state", "state_code", "state code", "st", "province"];

const ZIP_CODE_ALIASES: &[&str] = &[
    "zip_code",
    "zip code",
    "zip",
    "zipcode",
    "postal_code",
    "postal code",
    "postalcode",
];

const UNITS_ALIASES: &[&str] = &[
    "units",
    "unit_count",
    "unit count",
    "total_units",
    "total units",
    "total managed units",
    "num_units",
    "num units",
    "number_of_units",
    "number of units",
    "# units",
    "#units",
    "unit_total",
    "unit total",
    "apt_count",
    "apartment_count",
    "doors",
];

const OWNERSHIP_GROUP_NAME_ALIASES: &[&str] = &[
    "ownership_group_name",
    "ownership group name",
    "ownership_group",
    "ownership group",
    "owner",
    "owner_name",
    "owner name",
    "ownership",
    "ownership name",
    "management_company",
    "management company",
    "management",
    "company",
    "company_name",
    "company name",
    "landlord",
    "proprietor",
    "holding_company",
    "holding company",
    "client",
    "client_name",
    "client name",
    "primary_client",
    "primary client",
    "primary client name",
    "customer",
    "customer_name",
    "customer name",
];

impl CanonicalField {
    /// Number of canonical fields
    pub const COUNT: usize = 7;

    /// All fields in output column order
    pub const ALL: [CanonicalField; Self::COUNT] = [
        CanonicalField::CommunityName,
        CanonicalField::Street,
        CanonicalField::City,
        CanonicalField::State,
        CanonicalField::ZipCode,
        CanonicalField::Units,
        CanonicalField::OwnershipGroupName,
    ];

    /// Output column name
    pub fn name(self) -> &'static str {
        match self {
            CanonicalField::CommunityName => "community_name",
            CanonicalField::Street => "street",
            CanonicalField::City => "city",
            CanonicalField::State => "state",
            CanonicalField::ZipCode => "zip_code",
            CanonicalField::Units => "units",
            CanonicalField::OwnershipGroupName => "ownership_group_name",
        }
    }

    /// Position of this field in the output
    pub fn index(self) -> usize {
        self as usize
    }

    /// Recognized input spellings, highest precedence first
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            CanonicalField::CommunityName => COMMUNITY_NAME_ALIASES,
            CanonicalField::Street => STREET_ALIASES,
            CanonicalField::City => CITY_ALIASES,
            CanonicalField::State => STATE_ALIASES,
            CanonicalField::ZipCode => ZIP_CODE_ALIASES,
            CanonicalField::Units => UNITS_ALIASES,
            CanonicalField::OwnershipGroupName => OWNERSHIP_GROUP_NAME_ALIASES,
        }
    }

    /// Look up a field by its output column name
    pub fn from_name(name: &str) -> Option<Self> {
        let wanted = name.trim().to_lowercase();
        Self::ALL.into_iter().find(|f| f.name() == wanted)
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CanonicalField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| Error::UnknownField(s.to_string()))
    }
}

/// The output header row
pub fn canonical_header() -> [&'static str; CanonicalField::COUNT] {
    CanonicalField::ALL.map(CanonicalField::name)
}
