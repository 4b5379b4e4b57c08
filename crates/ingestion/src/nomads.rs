//! NOMADS GFS filter URLs.
//!
//! The filter CGI cuts a single variable/level out of a GFS output file and
//! returns it as GRIB2. Every request covers the whole globe.

use forecast_common::{FetchParameters, Resolution, VariableSelector};

/// Filter CGI prefix; the grid code and `.pl` are appended.
pub const DEFAULT_BASE_URL: &str = "https://nomads.ncep.noaa.gov/cgi-bin/filter_gfs_";

const GLOBAL_BBOX: &str = "leftlon=0&rightlon=360&toplat=90&bottomlat=-90";

/// GFS output file name for a run, resolution and forecast hour.
///
/// The 0.50 degree product is only published as the "full" file set.
pub fn grib_file_name(params: &FetchParameters) -> String {
    let full = if params.resolution == Resolution::Medium {
        "full"
    } else {
        ""
    };
    format!(
        "gfs.t{}z.pgrb2{}.{}.f{:03}",
        params.run.code(),
        full,
        params.resolution.code(),
        params.forecast_hour()
    )
}

/// Filter URL without the variable selection.
pub fn run_url(base_url: &str, params: &FetchParameters) -> String {
    format!(
        "{}{}.pl?file={}&{}&dir=%2Fgfs.{}%2F{}%2Fatmos",
        base_url,
        params.resolution.code(),
        grib_file_name(params),
        GLOBAL_BBOX,
        params.date_code(),
        params.run.code()
    )
}

/// Filter URL selecting one variable at one level.
pub fn variable_url(base_url: &str, params: &FetchParameters, selector: VariableSelector) -> String {
    format!(
        "{}&{}=on&var_{}=on",
        run_url(base_url, params),
        selector.level.query_param(),
        selector.variable.code()
    )
}
