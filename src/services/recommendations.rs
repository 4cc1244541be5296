use crate::models::Archetype;

/// Destination recommendations for an archetype
///
/// Static, ordered, and never empty for a vocabulary archetype.
pub fn recommendations_for(archetype: Archetype) -> &'static [&'static str] {
    match archetype {
        Archetype::MindfulSeeker => &["Bali, Indonesia", "Kyoto, Japan", "Kerala, India"],
        Archetype::CuriousConnector => &[
            "Lisbon, Portugal",
            "Istanbul, Turkey",
            "Buenos Aires, Argentina",
        ],
        Archetype::IndependentExplorer => &["New Zealand", "Iceland", "Scotland Highlands"],
        Archetype::EarthLover => &["Costa Rica", "Norwegian Fjords", "Patagonia, Chile"],
        Archetype::ElegantVoyager => &["Paris, France", "Vienna, Austria", "Florence, Italy"],
        Archetype::CulturalAlchemist => {
            &["Marrakech, Morocco", "Lahore, Pakistan", "Hanoi, Vietnam"]
        }
        Archetype::TrailblazingEnergizer => &["Peru", "South Africa", "Arizona, USA"],
        Archetype::HeartfulHealer => &["Sedona, USA", "Rishikesh, India", "Ubud, Bali"],
        Archetype::RadiantNomad => &["Thailand", "Mexico", "Portugal"],
        Archetype::StructuredNomad => &["Germany", "Singapore", "Canada"],
        Archetype::WildMystic => &["Amazon Rainforest", "Tibet", "Madagascar"],
        Archetype::OffbeatNomad => &["Georgia (Tbilisi)", "Uzbekistan", "Bhutan"],
        Archetype::SensoryWanderer => &["Italy", "Morocco", "Thailand"],
        Archetype::InnerVoyager => &["Nepal", "Sri Lanka", "Greece"],
        Archetype::TimeTraveler => &["Rome", "Cairo", "Athens"],
        Archetype::SacredPilgrim => &["Mecca", "Varanasi", "Jerusalem"],
        Archetype::UrbanSoulwalker => &["New York City", "Berlin", "Tokyo"],
    }
}

/// Recommendations for a free-form archetype label
///
/// Unknown labels get an empty list rather than an error.
pub fn recommendations_for_label(label: &str) -> &'static [&'static str] {
    label
        .parse::<Archetype>()
        .map(recommendations_for)
        .unwrap_or(&[])
}
