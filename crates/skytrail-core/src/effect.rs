//! Surface identities and which of them are shown.

use serde::{Deserialize, Serialize};

/// One full-viewport drawing surface, owned by exactly one effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceId {
    Airplanes,
    Network,
}

impl SurfaceId {
    /// Stable element id of the surface.
    pub fn element_id(&self) -> &'static str {
        match self {
            SurfaceId::Airplanes => "airplaneCanvas",
            SurfaceId::Network => "networkCanvas",
        }
    }
}

/// Which surfaces are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectSelection {
    #[default]
    Both,
    Airplanes,
    Network,
}

impl EffectSelection {
    /// Cycle to the next selection.
    pub fn next(self) -> Self {
        match self {
            EffectSelection::Both => EffectSelection::Airplanes,
            EffectSelection::Airplanes => EffectSelection::Network,
            EffectSelection::Network => EffectSelection::Both,
        }
    }

    /// Whether the given surface is rendered under this selection.
    pub fn shows(self, surface: SurfaceId) -> bool {
        matches!(
            (self, surface),
            (EffectSelection::Both, _)
                | (EffectSelection::Airplanes, SurfaceId::Airplanes)
                | (EffectSelection::Network, SurfaceId::Network)
        )
    }

    /// Display name for the selection.
    pub fn name(&self) -> &'static str {
        match self {
            EffectSelection::Both => "Both",
            EffectSelection::Airplanes => "Airplanes",
            EffectSelection::Network => "Network",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_returns_to_start() {
        let start = EffectSelection::Both;
        assert_eq!(start.next().next().next(), start);
    }

    #[test]
    fn test_shows() {
        assert!(EffectSelection::Both.shows(SurfaceId::Airplanes));
        assert!(EffectSelection::Both.shows(SurfaceId::Network));
        assert!(EffectSelection::Airplanes.shows(SurfaceId::Airplanes));
        assert!(!EffectSelection::Airplanes.shows(SurfaceId::Network));
        assert!(!EffectSelection::Network.shows(SurfaceId::Airplanes));
    }

    #[test]
    fn test_element_ids() {
        assert_eq!(SurfaceId::Airplanes.element_id(), "airplaneCanvas");
        assert_eq!(SurfaceId::Network.element_id(), "networkCanvas");
    }
}
