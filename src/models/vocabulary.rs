//! Fixed label vocabularies: the badges a traveler can pick and the
//! archetypes the classifier can assign.

use std::fmt::Display;

/// Error returned when a label is not part of a vocabulary
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown {kind}: {value}")]
pub struct UnknownLabel {
    pub kind: &'static str,
    pub value: String,
}

/// Declares a closed, ordered label vocabulary.
///
/// Variant order is the vocabulary order: `index()` is stable and is what the
/// feature encoder uses for vector positions. Values (de)serialize as their
/// display label rather than the Rust variant name.
macro_rules! vocabulary {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($variant:ident => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Every label, in vocabulary order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Vocabulary size
            pub const COUNT: usize = Self::ALL.len();

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            /// Position of this label in the vocabulary
            pub fn index(&self) -> usize {
                *self as usize
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = UnknownLabel;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $($label => Ok($name::$variant),)+
                    other => Err(UnknownLabel {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let label = String::deserialize(deserializer)?;
                label.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

vocabulary! {
    /// A short descriptive tag a traveler selects to describe their preferences
    Badge, "badge" {
        InnerFlow => "Inner + Flow",
        NatureStillness => "Nature + Stillness",
        CultureConnection => "Culture + Connection",
        CommunityLocalFirst => "Community & Local First",
        FoodSoul => "Food + Soul",
        WonderMystery => "Wonder + Mystery",
        SoloTraveler => "Solo Traveler",
        OffThePath => "Off the Path",
        RefinementAesthetics => "Refinement + Aesthetics",
        LuxuryRefined => "Luxury/Refined",
        BudgetFriendly => "Budget-Friendly",
        AdrenalineWild => "Adrenaline + Wild",
        UrbanDiscovery => "Urban + Discovery",
        SlowSoulful => "Slow & Soulful",
        HeritageHistory => "Heritage + History",
        HolisticEthicalTravel => "Holistic Ethical Travel",
        CraftCreation => "Craft + Creation",
        JournalToSelf => "Journal to Self",
    }
}

vocabulary! {
    /// Travel-personality classification target
    Archetype, "archetype" {
        MindfulSeeker => "Mindful Seeker",
        CuriousConnector => "Curious Connector",
        IndependentExplorer => "Independent Explorer",
        EarthLover => "Earth Lover",
        ElegantVoyager => "Elegant Voyager",
        CulturalAlchemist => "Cultural Alchemist",
        TrailblazingEnergizer => "Trailblazing Energizer",
        HeartfulHealer => "Heartful Healer",
        RadiantNomad => "Radiant Nomad",
        StructuredNomad => "Structured Nomad",
        WildMystic => "Wild Mystic",
        OffbeatNomad => "Offbeat Nomad",
        SensoryWanderer => "Sensory Wanderer",
        InnerVoyager => "Inner Voyager",
        TimeTraveler => "Time Traveler",
        SacredPilgrim => "Sacred Pilgrim",
        UrbanSoulwalker => "Urban Soulwalker",
    }
}

impl Archetype {
    /// Looks up an archetype by vocabulary position
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabulary_sizes() {
        assert_eq!(Badge::COUNT, 18);
        assert_eq!(Archetype::COUNT, 17);
    }

    #[test]
    fn test_index_matches_position() {
        for (i, badge) in Badge::ALL.iter().enumerate() {
            assert_eq!(badge.index(), i);
        }
        assert_eq!(Archetype::from_index(16), Some(Archetype::UrbanSoulwalker));
        assert_eq!(Archetype::from_index(17), None);
    }

    #[test]
    fn test_parse_label() {
        let badge: Badge = "Community & Local First".parse().unwrap();
        assert_eq!(badge, Badge::CommunityLocalFirst);

        let err = "Beach Bum".parse::<Badge>().unwrap_err();
        assert_eq!(err.kind, "badge");
        assert_eq!(err.to_string(), "Unknown badge: Beach Bum");
    }

    #[test]
    fn test_serializes_as_display_label() {
        let json = serde_json::to_string(&Archetype::TimeTraveler).unwrap();
        assert_eq!(json, "\"Time Traveler\"");

        let badge: Badge = serde_json::from_str("\"Luxury/Refined\"").unwrap();
        assert_eq!(badge, Badge::LuxuryRefined);
    }

    #[test]
    fn test_deserialize_rejects_unknown_label() {
        let result = serde_json::from_str::<Archetype>("\"Couch Potato\"");
        assert!(result.is_err());
    }
}
