//! Screen identifiers and their mapping to controller sections.

use std::fmt;

use roombook_core::Section;

/// Primary screens, navigable by number keys 1-3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScreenId {
    #[default]
    Overview, // 1
    Catalog,  // 2
    Bookings, // 3
}

impl ScreenId {
    /// All screens in tab-bar order.
    pub const ALL: [ScreenId; 3] = [Self::Overview, Self::Catalog, Self::Bookings];

    pub fn number(self) -> u8 {
        match self {
            Self::Overview => 1,
            Self::Catalog => 2,
            Self::Bookings => 3,
        }
    }

    /// Screen from a numeric key. Returns None for out-of-range.
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::Overview),
            2 => Some(Self::Catalog),
            3 => Some(Self::Bookings),
            _ => None,
        }
    }

    /// Next screen in tab order (wraps around).
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|&s| s == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Previous screen in tab order (wraps around).
    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|&s| s == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::Catalog => "Rooms",
            Self::Bookings => "Bookings",
        }
    }

    pub fn section(self) -> Section {
        match self {
            Self::Overview => Section::Overview,
            Self::Catalog => Section::Catalog,
            Self::Bookings => Section::Bookings,
        }
    }
}

impl From<Section> for ScreenId {
    fn from(section: Section) -> Self {
        match section {
            Section::Overview => Self::Overview,
            Section::Catalog => Self::Catalog,
            Section::Bookings => Self::Bookings,
        }
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_keys_round_trip() {
        for id in ScreenId::ALL {
            assert_eq!(ScreenId::from_number(id.number()), Some(id));
        }
        assert_eq!(ScreenId::from_number(0), None);
        assert_eq!(ScreenId::from_number(4), None);
    }

    #[test]
    fn tab_order_wraps() {
        assert_eq!(ScreenId::Bookings.next(), ScreenId::Overview);
        assert_eq!(ScreenId::Overview.prev(), ScreenId::Bookings);
    }

    #[test]
    fn sections_map_both_ways() {
        for id in ScreenId::ALL {
            assert_eq!(ScreenId::from(id.section()), id);
        }
    }
}
