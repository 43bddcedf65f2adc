/// Build metadata embedded by `build.rs`.
#[derive(Debug, Clone, Copy)]
pub struct BuildMetadata {
    pub version: &'static str,
    pub commit: &'static str,
    pub target: &'static str,
    pub built_on: &'static str,
}

impl BuildMetadata {
    /// One-line summary printed by the `version` command.
    pub fn summary(&self) -> String {
        format!(
            "member_form {} ({}, {}, built {})",
            self.version, self.commit, self.target, self.built_on
        )
    }
}

pub fn current() -> BuildMetadata {
    BuildMetadata {
        version: env!("CARGO_PKG_VERSION"),
        commit: option_env!("MEMBER_FORM_BUILD_COMMIT").unwrap_or("unknown"),
        target: option_env!("MEMBER_FORM_BUILD_TARGET").unwrap_or("unknown"),
        built_on: option_env!("MEMBER_FORM_BUILD_DATE").unwrap_or("unknown"),
    }
}
