/// Variable and dimension names used to locate data in a WRF output
/// file.
///
/// The names are model conventions rather than part of the file
/// format, so they live in a lookup table instead of being scattered
/// through the code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarNames {
    /// Level-set function on the fire grid.
    pub lfn: String,

    /// Fire grid longitude.
    pub fire_lon: String,

    /// Fire grid latitude.
    pub fire_lat: String,

    /// Atmosphere grid longitude.
    pub atm_lon: String,

    /// Atmosphere grid latitude.
    pub atm_lat: String,

    /// Fixed width `YYYY-MM-DD_HH:MM:SS` timestamps, one per step.
    pub times: String,

    /// Atmosphere grid west-east dimension (cell count).
    pub west_east: String,

    /// Atmosphere grid south-north dimension (cell count).
    pub south_north: String,

    /// Suffix identifying fire grid dimensions.
    pub subgrid_suffix: String,
}

impl Default for VarNames {
    fn default() -> Self {
        Self {
            lfn: "LFN".into(),
            fire_lon: "FXLONG".into(),
            fire_lat: "FXLAT".into(),
            atm_lon: "XLONG".into(),
            atm_lat: "XLAT".into(),
            times: "Times".into(),
            west_east: "west_east".into(),
            south_north: "south_north".into(),
            subgrid_suffix: "subgrid".into(),
        }
    }
}

impl VarNames {
    /// Returns true if `dim` names a fire grid dimension.
    pub fn is_subgrid_dim(&self, dim: &str) -> bool {
        dim.ends_with(&self.subgrid_suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::VarNames;

    #[test]
    fn test_subgrid_dim() {
        let names = VarNames::default();
        assert!(names.is_subgrid_dim("west_east_subgrid"));
        assert!(names.is_subgrid_dim("south_north_subgrid"));
        assert!(!names.is_subgrid_dim("west_east"));
        assert!(!names.is_subgrid_dim("Time"));
    }
}
