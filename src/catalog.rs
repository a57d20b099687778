//! Seed data for the studio's service catalogue.

use crate::models::Service;

struct SeedService {
    name: &'static str,
    description: &'static str,
    features: [&'static str; 3],
    price: &'static str,
    duration: &'static str,
}

const SEED: [SeedService; 4] = [
    SeedService {
        name: "Personal Training",
        description: "One-on-one customized fitness programs tailored to your goals",
        features: ["Custom workouts", "Progress tracking", "Nutrition guidance"],
        price: "₹2000/session",
        duration: "60 minutes",
    },
    SeedService {
        name: "Group Classes",
        description: "Energetic group fitness sessions for motivation and community",
        features: ["Variety of classes", "Expert instructors", "Community support"],
        price: "₹800/session",
        duration: "45 minutes",
    },
    SeedService {
        name: "Nutrition Counseling",
        description: "Professional dietary guidance for optimal health",
        features: ["Meal planning", "Diet assessment", "Lifestyle coaching"],
        price: "₹1500/session",
        duration: "45 minutes",
    },
    SeedService {
        name: "Rehabilitation",
        description: "Recovery programs for injuries and therapy needs",
        features: ["Injury recovery", "Physical therapy", "Pain management"],
        price: "₹2500/session",
        duration: "60 minutes",
    },
];

/// The default catalogue, numbered from 1 in seed order
#[must_use]
pub fn default_services() -> Vec<Service> {
    SEED.iter()
        .zip(1_i64..)
        .map(|(seed, id)| Service {
            id,
            name: seed.name.to_string(),
            description: seed.description.to_string(),
            features: seed.features.iter().map(ToString::to_string).collect(),
            price: seed.price.to_string(),
            duration: seed.duration.to_string(),
            active: true,
        })
        .collect()
}
