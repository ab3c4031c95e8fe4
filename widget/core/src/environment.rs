use serde::{Deserialize, Serialize};

/// How the host page handles navigation.
///
/// `Spa` hosts replace DOM subtrees on soft navigations, so the widget must
/// defend against being orphaned; `Mpa` hosts reload the whole page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvironmentLabel {
    Spa,
    Mpa,
}

impl EnvironmentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvironmentLabel::Spa => "spa",
            EnvironmentLabel::Mpa => "mpa",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "spa" => Some(EnvironmentLabel::Spa),
            "mpa" => Some(EnvironmentLabel::Mpa),
            _ => None,
        }
    }

    /// Merge a new observation into the current belief.
    ///
    /// The upgrade is monotonic: once a page is believed to be a SPA it is
    /// never downgraded back to MPA.
    pub fn upgraded_with(self, observed: EnvironmentLabel) -> Self {
        match (self, observed) {
            (EnvironmentLabel::Spa, _) | (_, EnvironmentLabel::Spa) => EnvironmentLabel::Spa,
            _ => EnvironmentLabel::Mpa,
        }
    }
}
