//! Location records and lookup results.

use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// Administrative location stored against an H3 cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationDetails {
    /// City or town name
    #[serde(default)]
    pub city: String,

    /// State or union territory
    #[serde(default)]
    pub state: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,

    /// Postal (PIN) code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pincode: Option<String>,
}

impl LocationDetails {
    pub fn new(city: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            state: state.into(),
            district: None,
            pincode: None,
        }
    }

    pub fn with_district(mut self, district: impl Into<String>) -> Self {
        self.district = Some(district.into());
        self
    }

    pub fn with_pincode(mut self, pincode: impl Into<String>) -> Self {
        self.pincode = Some(pincode.into());
        self
    }
}

/// A location together with the cell that produced it.
///
/// `matched_h3` may be an ancestor of the queried cell when the lookup fell
/// back to a coarser resolution; `matched_resolution` is never finer than the
/// resolution the lookup started at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeocodeResult {
    #[serde(flatten)]
    pub location: LocationDetails,

    pub matched_h3: String,

    pub matched_resolution: u8,
}

impl Deref for GeocodeResult {
    type Target = LocationDetails;

    fn deref(&self) -> &Self::Target {
        &self.location
    }
}
