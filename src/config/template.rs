/// How strongly a framebuffer attribute is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttributeRequirement {
    /// Configurations without the attribute are preferred.
    #[default]
    Unnecessary,
    /// The attribute is wanted but its absence is acceptable.
    Preferred,
    /// Configurations without the attribute are rejected.
    Required,
}

/// Opaque handle to a platform framebuffer configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConfigHandle(pub u64);

/// The attributes a concrete configuration actually offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConfigCapabilities {
    pub double_buffer: bool,
    pub stereo: bool,
    pub accum_antialiasing: bool,
    pub multisample_antialiasing: bool,
    /// Depth buffer size in bits.
    pub depth_size: i32,
}

/// Requested framebuffer attributes for visual selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigTemplate {
    pub double_buffer: AttributeRequirement,
    pub stereo: AttributeRequirement,
    /// Satisfied by either accumulation or multisample antialiasing.
    pub scene_antialiasing: AttributeRequirement,
    /// Minimum depth buffer size in bits.
    pub depth_size: i32,
}

impl Default for ConfigTemplate {
    fn default() -> Self {
        Self {
            double_buffer: AttributeRequirement::Preferred,
            stereo: AttributeRequirement::Unnecessary,
            scene_antialiasing: AttributeRequirement::Unnecessary,
            depth_size: 16,
        }
    }
}

impl ConfigTemplate {
    /// Scores a candidate configuration against this template.
    ///
    /// Returns None when a `Required` attribute (or the minimum depth
    /// size) is unmet. Otherwise higher is better: `Preferred` attributes
    /// score when present, `Unnecessary` attributes score when absent.
    #[must_use]
    pub fn score(&self, caps: &ConfigCapabilities) -> Option<i32> {
        if caps.depth_size < self.depth_size {
            return None;
        }
        let antialiasing = caps.accum_antialiasing || caps.multisample_antialiasing;
        Some(
            attribute_score(self.double_buffer, caps.double_buffer)?
                + attribute_score(self.stereo, caps.stereo)?
                + attribute_score(self.scene_antialiasing, antialiasing)?,
        )
    }
}

fn attribute_score(requirement: AttributeRequirement, present: bool) -> Option<i32> {
    match (requirement, present) {
        (AttributeRequirement::Required, false) => None,
        (AttributeRequirement::Required, true) => Some(2),
        (AttributeRequirement::Preferred, present) => Some(i32::from(present)),
        (AttributeRequirement::Unnecessary, present) => Some(i32::from(!present)),
    }
}

/// Platform backend answering configuration queries for a screen.
///
/// Implementations own the native enumeration; the trait's provided
/// methods give every backend the same selection and capability-check
/// semantics.
pub trait ConfigSource {
    /// All candidate configurations offered by `screen`.
    fn configurations(&self, screen: u32) -> Vec<(ConfigHandle, ConfigCapabilities)>;

    /// The attributes of one configuration, if it exists on this source.
    fn capabilities(&self, config: ConfigHandle) -> Option<ConfigCapabilities>;

    /// The best-scoring configuration matching `template`, or None when
    /// nothing matches (unsupported, not an error).
    fn choose_best_configuration(
        &self,
        screen: u32,
        template: &ConfigTemplate,
    ) -> Option<ConfigHandle> {
        self.configurations(screen)
            .into_iter()
            .filter_map(|(handle, caps)| template.score(&caps).map(|s| (s, handle)))
            .max_by_key(|&(score, _)| score)
            .map(|(_, handle)| handle)
    }

    fn is_configuration_supported(&self, screen: u32, template: &ConfigTemplate) -> bool {
        self.choose_best_configuration(screen, template).is_some()
    }

    fn has_double_buffer(&self, config: ConfigHandle) -> bool {
        self.capabilities(config).is_some_and(|c| c.double_buffer)
    }

    fn has_stereo(&self, config: ConfigHandle) -> bool {
        self.capabilities(config).is_some_and(|c| c.stereo)
    }

    fn has_accum_antialiasing(&self, config: ConfigHandle) -> bool {
        self.capabilities(config).is_some_and(|c| c.accum_antialiasing)
    }

    fn has_multisample_antialiasing(&self, config: ConfigHandle) -> bool {
        self.capabilities(config)
            .is_some_and(|c| c.multisample_antialiasing)
    }
}
