use serde::{Deserialize, Serialize};

/// Aggregate state of the environment at the end of one day.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DayStats {
    pub day: u32,
    pub population: usize,
    /// One `[size, speed, sense]` row per living organism.
    pub attributes: Vec<[f64; 3]>,
    /// Food replenishment target for the coming day.
    pub food: usize,
}

impl DayStats {
    #[must_use]
    pub fn mean_traits(&self) -> Option<[f64; 3]> {
        if self.attributes.is_empty() {
            return None;
        }
        let n = self.attributes.len() as f64;
        let mut sum = [0.0; 3];
        for row in &self.attributes {
            for (s, v) in sum.iter_mut().zip(row) {
                *s += v;
            }
        }
        Some(sum.map(|s| s / n))
    }
}

/// Column-oriented history of a run: one entry per recorded day.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RunStats {
    pub population: Vec<usize>,
    pub attributes: Vec<Vec<[f64; 3]>>,
    pub food: Vec<usize>,
}

impl RunStats {
    pub fn record(&mut self, day: DayStats) {
        self.population.push(day.population);
        self.attributes.push(day.attributes);
        self.food.push(day.food);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.population.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.population.is_empty()
    }

    /// Reassembles the row for day `index`.
    #[must_use]
    pub fn day(&self, index: usize) -> Option<DayStats> {
        Some(DayStats {
            day: u32::try_from(index).ok()?,
            population: *self.population.get(index)?,
            attributes: self.attributes.get(index)?.clone(),
            food: *self.food.get(index)?,
        })
    }

    #[must_use]
    pub fn last(&self) -> Option<DayStats> {
        self.len().checked_sub(1).and_then(|i| self.day(i))
    }

    #[must_use]
    pub fn peak_population(&self) -> usize {
        self.population.iter().copied().max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_keeps_columns_aligned() {
        let mut stats = RunStats::default();
        stats.record(DayStats {
            day: 0,
            population: 2,
            attributes: vec![[1.0, 1.0, 3.0], [2.0, 1.0, 3.0]],
            food: 50,
        });
        stats.record(DayStats {
            day: 1,
            population: 1,
            attributes: vec![[1.0, 1.0, 3.0]],
            food: 45,
        });
        assert_eq!(stats.len(), 2);
        let last = stats.last().unwrap();
        assert_eq!(last.day, 1);
        assert_eq!(last.food, 45);
        assert_eq!(stats.peak_population(), 2);
    }

    #[test]
    fn test_mean_traits() {
        let day = DayStats {
            day: 0,
            population: 2,
            attributes: vec![[1.0, 2.0, 3.0], [3.0, 2.0, 1.0]],
            food: 0,
        };
        assert_eq!(day.mean_traits(), Some([2.0, 2.0, 2.0]));
        assert_eq!(DayStats::default().mean_traits(), None);
    }

    #[test]
    fn test_json_shape() {
        let mut stats = RunStats::default();
        stats.record(DayStats {
            day: 0,
            population: 1,
            attributes: vec![[1.0, 1.0, 3.0]],
            food: 50,
        });
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["population"][0], 1);
        assert_eq!(json["food"][0], 50);
        assert_eq!(json["attributes"][0][0][2], 3.0);
    }
}
