//! Camera object behavior.

use splice_core::{Behavior, HostRef, ParmDefaults};

/// Environment variable that enables the aperture expression.
pub const CAM_APT_VAR: &str = "CAM_APT";

/// `object/cam`: ties resolution, pixel aspect and optionally aperture to
/// scene variables on creation.
#[derive(Debug)]
pub struct Cam {
    host: HostRef,
    aperture: Option<bool>,
}

impl Cam {
    /// Camera behavior reading `CAM_APT` from the environment.
    pub fn new(host: HostRef) -> Self {
        Self {
            host,
            aperture: None,
        }
    }

    /// Camera behavior with the aperture expression forced on or off.
    pub fn with_aperture(host: HostRef, enabled: bool) -> Self {
        Self {
            host,
            aperture: Some(enabled),
        }
    }

    fn aperture_enabled(&self) -> bool {
        self.aperture.unwrap_or_else(|| {
            std::env::var_os(CAM_APT_VAR).is_some_and(|value| !value.is_empty())
        })
    }
}

impl Behavior for Cam {
    fn host(&self) -> &HostRef {
        &self.host
    }

    fn default_parms(&self) -> ParmDefaults {
        let mut defaults = ParmDefaults::new();
        defaults.insert("resx", "$RESX");
        defaults.insert("resy", "$RESY");
        defaults.insert("aspect", "$PIX_AR");
        if self.aperture_enabled() {
            defaults.insert("aperture", "$CAM_APT");
        }
        defaults
    }
}
