use log::debug;

use crate::error::ReconError;

pub const LOCATION: &str = "location";
pub const REMARKS: &str = "remark";
pub const ADDRESS: &str = "address";
pub const SUITE: &str = "suite";
pub const CITY: &str = "city";
pub const STATE: &str = "state";
pub const ZIP: &str = "zip";

/// First header, in header order, whose lowercase text contains `needle`
/// (case-insensitive). `None` when nothing matches.
pub fn find_column<'a>(headers: &'a [String], needle: &str) -> Option<&'a str> {
    let needle = needle.to_lowercase();
    headers
        .iter()
        .find(|h| h.to_lowercase().contains(&needle))
        .map(String::as_str)
}

/// Columns located in the merged output header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputColumns {
    pub location: String,
    pub remarks: Option<String>,
}

impl OutputColumns {
    pub fn resolve(headers: &[String]) -> Result<Self, ReconError> {
        let location = find_column(headers, LOCATION).ok_or_else(|| {
            ReconError::UnresolvableLocationColumn { headers: headers.to_vec() }
        })?;
        let remarks = find_column(headers, REMARKS);

        debug!("output columns: location={location:?} remarks={remarks:?}");

        Ok(Self {
            location: location.to_string(),
            remarks: remarks.map(str::to_string),
        })
    }
}

/// Columns located in the input list header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputColumns {
    pub address: String,
    pub suite: Option<String>,
    pub city: String,
    pub state: String,
    pub zip: Option<String>,
}

impl InputColumns {
    /// Address, city and state are required; every missing one is reported.
    pub fn resolve(headers: &[String]) -> Result<Self, ReconError> {
        let address = find_column(headers, ADDRESS);
        let city = find_column(headers, CITY);
        let state = find_column(headers, STATE);

        let (Some(address), Some(city), Some(state)) = (address, city, state) else {
            let missing = [(ADDRESS, address), (CITY, city), (STATE, state)]
                .into_iter()
                .filter(|(_, found)| found.is_none())
                .map(|(name, _)| name)
                .collect();
            return Err(ReconError::UnresolvableAddressSchema { missing });
        };

        let suite = find_column(headers, SUITE);
        let zip = find_column(headers, ZIP);

        debug!(
            "input columns: address={address:?} suite={suite:?} city={city:?} state={state:?} zip={zip:?}"
        );

        Ok(Self {
            address: address.to_string(),
            suite: suite.map(str::to_string),
            city: city.to_string(),
            state: state.to_string(),
            zip: zip.map(str::to_string),
        })
    }
}
