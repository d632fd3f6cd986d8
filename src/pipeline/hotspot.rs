use std::collections::BTreeMap;

use crate::model::Hotspot;

/// Tile 6 in scan order is the precision pointer and gets a centred hotspot.
pub const CENTERED_TILE_INDEX: usize = 6;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HotspotRule {
    #[default]
    Origin,
    Center,
}

impl HotspotRule {
    pub fn apply(self, width: u32, height: u32) -> Hotspot {
        match self {
            HotspotRule::Origin => Hotspot::new(0, 0),
            HotspotRule::Center => Hotspot::new(width / 2, height / 2),
        }
    }
}

/// Default hotspot per tile, keyed on the absolute 1-based tile index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HotspotPolicy {
    fallback: HotspotRule,
    rules: BTreeMap<usize, HotspotRule>,
}

impl Default for HotspotPolicy {
    fn default() -> Self {
        Self::uniform(HotspotRule::Origin).with_rule(CENTERED_TILE_INDEX, HotspotRule::Center)
    }
}

impl HotspotPolicy {
    pub fn uniform(rule: HotspotRule) -> Self {
        Self {
            fallback: rule,
            rules: BTreeMap::new(),
        }
    }

    pub fn with_rule(mut self, index: usize, rule: HotspotRule) -> Self {
        self.rules.insert(index, rule);
        self
    }

    pub fn rule_for(&self, index: usize) -> HotspotRule {
        self.rules.get(&index).copied().unwrap_or(self.fallback)
    }

    pub fn assign(&self, index: usize, width: u32, height: u32) -> Hotspot {
        self.rule_for(index).apply(width, height)
    }
}
