//! Coarse weather categories and the ambient effects they drive.

use serde::{Deserialize, Serialize};

/// Weather category used to pick ambient visual effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Rain,
    Clouds,
    Sunny,
    Snow,
    #[default]
    Default,
}

struct Rule {
    category: Category,
    keywords: &'static [&'static str],
    icon_prefixes: &'static [&'static str],
}

// Evaluated top to bottom; the first match wins.
const RULES: &[Rule] = &[
    Rule {
        category: Category::Rain,
        keywords: &["rain", "drizzle"],
        icon_prefixes: &["09", "10"],
    },
    Rule {
        category: Category::Clouds,
        keywords: &["cloud"],
        icon_prefixes: &["02", "03", "04"],
    },
    Rule {
        category: Category::Sunny,
        keywords: &["clear", "sun"],
        icon_prefixes: &["01"],
    },
    Rule {
        category: Category::Snow,
        keywords: &["snow"],
        icon_prefixes: &["13"],
    },
];

/// Classify a weather description and icon code into a [`Category`].
pub fn classify(description: &str, icon: &str) -> Category {
    let description = description.to_lowercase();

    RULES
        .iter()
        .find(|rule| {
            rule.keywords.iter().any(|kw| description.contains(kw))
                || rule.icon_prefixes.iter().any(|p| icon.starts_with(p))
        })
        .map(|rule| rule.category)
        .unwrap_or_default()
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Rain => "rain",
            Category::Clouds => "clouds",
            Category::Sunny => "sunny",
            Category::Snow => "snow",
            Category::Default => "default",
        }
    }

    /// Ambient effect drawn for this category.
    pub fn scene(&self) -> AmbientScene {
        match self {
            Category::Rain => AmbientScene {
                particles: Some(Particles::RainDrops(50)),
                sun_rays: false,
                cloud_opacity: 1.0,
            },
            Category::Snow => AmbientScene {
                particles: Some(Particles::SnowFlakes(30)),
                sun_rays: false,
                cloud_opacity: 0.8,
            },
            Category::Sunny => AmbientScene {
                particles: None,
                sun_rays: true,
                cloud_opacity: 0.3,
            },
            Category::Clouds => AmbientScene {
                particles: None,
                sun_rays: false,
                cloud_opacity: 1.0,
            },
            Category::Default => AmbientScene {
                particles: None,
                sun_rays: false,
                cloud_opacity: 0.5,
            },
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Particles {
    RainDrops(u32),
    SnowFlakes(u32),
}

/// What the background should show for a category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientScene {
    pub particles: Option<Particles>,
    pub sun_rays: bool,
    /// 0.0 (hidden) ..= 1.0 (fully visible).
    pub cloud_opacity: f32,
}

/// Consumer of the category signal. Owns no core state.
pub trait AmbientEffectsSink: Send + Sync {
    fn apply(&self, category: Category, scene: AmbientScene);
}
