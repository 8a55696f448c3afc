//! Nimble Studio resource kinds

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceType {
    Studio,
    StudioComponent,
    LaunchProfile,
    StreamingImage,
}

impl ResourceType {
    pub const ALL: [ResourceType; 4] = [
        ResourceType::Studio,
        ResourceType::StudioComponent,
        ResourceType::LaunchProfile,
        ResourceType::StreamingImage,
    ];

    /// Schema type name
    pub fn type_name(&self) -> &'static str {
        match self {
            ResourceType::Studio => "AWS::NimbleStudio::Studio",
            ResourceType::StudioComponent => "AWS::NimbleStudio::StudioComponent",
            ResourceType::LaunchProfile => "AWS::NimbleStudio::LaunchProfile",
            ResourceType::StreamingImage => "AWS::NimbleStudio::StreamingImage",
        }
    }

    /// Command-line name
    pub fn slug(&self) -> &'static str {
        match self {
            ResourceType::Studio => "studio",
            ResourceType::StudioComponent => "studio-component",
            ResourceType::LaunchProfile => "launch-profile",
            ResourceType::StreamingImage => "streaming-image",
        }
    }

    /// Prefix of ids assigned by the service
    pub fn id_prefix(&self) -> &'static str {
        match self {
            ResourceType::Studio => "studio",
            ResourceType::StudioComponent => "sc",
            ResourceType::LaunchProfile => "lp",
            ResourceType::StreamingImage => "si",
        }
    }

    /// Kind whose id this one is scoped by
    pub fn parent(&self) -> Option<ResourceType> {
        match self {
            ResourceType::Studio => None,
            _ => Some(ResourceType::Studio),
        }
    }

    /// Resolve an id by its prefix
    pub fn from_id(id: &str) -> Option<ResourceType> {
        let (prefix, _) = id.rsplit_once('-')?;
        Self::ALL.into_iter().find(|t| t.id_prefix() == prefix)
    }
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

impl std::str::FromStr for ResourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.to_ascii_lowercase();
        ResourceType::ALL
            .into_iter()
            .find(|t| t.slug() == needle || t.type_name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown resource kind: {}", s))
    }
}
