use common::pet::Pet;

/// Pets whose name, species or breed contains `query`, ignoring case.
///
/// An empty query matches everything.
pub fn filter_pets<'a>(pets: &'a [Pet], query: &str) -> Vec<&'a Pet> {
    let needle = query.to_lowercase();
    pets.iter()
        .filter(|pet| {
            pet.name.to_lowercase().contains(&needle)
                || pet.species.to_lowercase().contains(&needle)
                || pet.breed.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Summary figures shown above the pet list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PetStats {
    pub count: usize,
    pub total_weight: f64,
    /// Mean age, or 0 with no pets.
    pub average_age: f64,
}

impl PetStats {
    pub fn of(pets: &[Pet]) -> Self {
        let count = pets.len();
        let total_weight = pets.iter().map(|p| p.weight).sum();
        let average_age = if count == 0 {
            0.0
        } else {
            pets.iter().map(|p| p.age).sum::<f64>() / count as f64
        };
        Self {
            count,
            total_weight,
            average_age,
        }
    }

    /// Average age rounded to one decimal, as displayed.
    pub fn average_age_display(&self) -> String {
        format!("{:.1}", self.average_age)
    }
}
