//! Output driver behaviors
//!
//! Each profile points a driver's output locations at the per-scene layout
//! under `$HIP`.

use serde_json::json;
use splice_core::{
    AttrValue, Behavior, BehaviorError, HostRef, ParmComponent, ParmDefaults, ParmValue,
};

/// Default parameters for one output driver type.
#[derive(Debug, Clone, Copy)]
pub struct OutputProfile {
    /// Lower-cased host category
    pub category: &'static str,
    /// Bare type name
    pub type_name: &'static str,
    /// Parameter holding the primary output path
    pub output_parm: &'static str,
    defaults: fn() -> ParmDefaults,
}

impl OutputProfile {
    /// Defaults applied on creation.
    pub fn defaults(&self) -> ParmDefaults {
        (self.defaults)()
    }
}

/// `driver/geometry`: geometry sequence cache.
pub const GEOMETRY: OutputProfile = OutputProfile {
    category: "driver",
    type_name: "geometry",
    output_parm: "sopoutput",
    defaults: || {
        ParmDefaults::from_iter([("sopoutput", "$HIP/geo/$HIPNAME/$HIPNAME.$OS.$F.bgeo.sc")])
    },
};

/// `driver/alembic`: Alembic archive.
pub const ALEMBIC: OutputProfile = OutputProfile {
    category: "driver",
    type_name: "alembic",
    output_parm: "filename",
    defaults: alembic_defaults,
};

/// `sop/rop_alembic`: Alembic archive written from inside a network.
pub const ROP_ALEMBIC: OutputProfile = OutputProfile {
    category: "sop",
    type_name: "rop_alembic",
    output_parm: "filename",
    defaults: alembic_defaults,
};

/// `driver/ifd`: scene description plus rendered image.
pub const IFD: OutputProfile = OutputProfile {
    category: "driver",
    type_name: "ifd",
    output_parm: "vm_picture",
    defaults: || {
        let mut defaults = ParmDefaults::new();
        defaults.insert("soho_outputmode", 1);
        defaults.insert("soho_diskfile", "$HIP/ifd/$HIPNAME/$OS/ifd/$OS.$F4.ifd");
        defaults.insert("vm_picture", "$HIP/renders/$HIPNAME/$OS/$OS.$F4.exr");
        defaults
    },
};

/// `driver/usdrender`: USD render with the stage saved beside the scene.
pub const USDRENDER: OutputProfile = OutputProfile {
    category: "driver",
    type_name: "usdrender",
    output_parm: "outputimage",
    defaults: || {
        let mut defaults = ParmDefaults::new();
        defaults.insert("outputimage", "$HIP/renders/$HIPNAME/$OS/$OS.$F4.exr");
        defaults.insert("lopoutput", "$HIP/ifd/$HIPNAME/render.$F4.usd");
        defaults.insert("savetodirectory_directory", "$HIP/ifd/$HIPNAME/");
        defaults.insert("runcommand", false);
        defaults
    },
};

/// `driver/arnold`: Arnold render with overscan relative to resolution.
pub const ARNOLD: OutputProfile = OutputProfile {
    category: "driver",
    type_name: "arnold",
    output_parm: "ar_picture",
    defaults: || {
        let mut defaults = ParmDefaults::new();
        defaults.insert("trange", 1);
        defaults.insert("ar_picture", "$HIP/renders/$HIPNAME/$OS/$OS.$F4.exr");
        defaults.insert("ar_overscan_enable", true);
        defaults.insert(
            "ar_overscan",
            vec![
                ParmValue::from("$RESY * 0.05"),
                ParmValue::from("$RESY * 0.05"),
                ParmValue::from("$RESX * 0.05"),
                ParmValue::from("$RESX * 0.05"),
            ],
        );
        defaults.insert("ar_exr_compression", "zips");
        defaults.insert("ar_exr_half_precision", true);
        defaults.insert("ar_texture_auto_maketx", false);
        defaults
    },
};

/// Every output profile, in registration order.
pub const PROFILES: &[OutputProfile] = &[GEOMETRY, ALEMBIC, ROP_ALEMBIC, IFD, USDRENDER, ARNOLD];

fn alembic_defaults() -> ParmDefaults {
    ParmDefaults::from_iter([("filename", "$HIP/geo/$HIPNAME/$HIPNAME.$OS.abc")])
}

/// Behavior for an output driver described by an [`OutputProfile`].
#[derive(Debug)]
pub struct OutputDriver {
    host: HostRef,
    profile: OutputProfile,
}

impl OutputDriver {
    /// Bind `profile` to a host object.
    pub fn new(host: HostRef, profile: OutputProfile) -> Self {
        Self { host, profile }
    }

    /// Profile this driver follows.
    pub fn profile(&self) -> &OutputProfile {
        &self.profile
    }

    fn output_path(&self) -> Result<AttrValue, BehaviorError> {
        let host = self.host.upgrade()?;
        let parm = self.profile.output_parm;
        let components = host
            .parm_value(parm)
            .ok_or_else(|| BehaviorError::failed(format!("output parameter '{parm}' is missing")))?;

        match components.first() {
            Some(ParmComponent::Expression(text)) => Ok(json!(text)),
            Some(ParmComponent::Literal(value)) => Ok(json!(value.to_string())),
            None => Ok(AttrValue::Null),
        }
    }
}

impl Behavior for OutputDriver {
    fn host(&self) -> &HostRef {
        &self.host
    }

    fn default_parms(&self) -> ParmDefaults {
        self.profile.defaults()
    }

    fn capabilities(&self) -> &[&'static str] {
        &["output_parm", "output_path"]
    }

    fn invoke(&mut self, name: &str, args: &[AttrValue]) -> Result<AttrValue, BehaviorError> {
        if !args.is_empty() {
            return Err(BehaviorError::invalid_arguments(name, "takes no arguments"));
        }
        match name {
            "output_parm" => Ok(json!(self.profile.output_parm)),
            "output_path" => self.output_path(),
            other => Err(BehaviorError::UnknownCapability(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use splice_core::DefaultValue;

    #[test]
    fn test_every_profile_defaults_its_output_parm() {
        for profile in PROFILES {
            let defaults = profile.defaults();
            assert!(
                defaults.get(profile.output_parm).is_some(),
                "{}/{} does not default {}",
                profile.category,
                profile.type_name,
                profile.output_parm
            );
        }
    }

    #[test]
    fn test_arnold_overscan_is_component_wise() {
        let defaults = ARNOLD.defaults();
        assert_matches::assert_matches!(
            defaults.get("ar_overscan"),
            Some(DefaultValue::Tuple(values)) if values.len() == 4
        );
    }
}
