//! Court location of a serve or a point

use serde::{Deserialize, Serialize};

/// Width and height of the court diagram
pub const COURT_EXTENT: f64 = 100.0;

/// Tap location on a court diagram, in percent of its width and height
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    pub x: f64,
    pub y: f64,
    /// Set in which the hit was recorded
    pub set: u8,
}

impl Hit {
    pub fn new(x: f64, y: f64, set: u8) -> Self {
        Self { x, y, set }
    }

    /// Both coordinates are finite and lie on the diagram
    pub fn is_on_court(&self) -> bool {
        let on = |v: f64| v.is_finite() && (0.0..=COURT_EXTENT).contains(&v);
        on(self.x) && on(self.y)
    }
}

/// Hits recorded in a given set
pub fn hits_in_set(hits: &[Hit], set: u8) -> impl Iterator<Item = &Hit> {
    hits.iter().filter(move |h| h.set == set)
}

/// Radius (in percent of the diagram) within which hits count towards a heat cell
pub const HEAT_RADIUS: f64 = 15.0;

/// Heat intensity 0.0..=1.0 around a point: three or more nearby hits saturate
pub fn heat_intensity(hits: &[Hit], x: f64, y: f64) -> f64 {
    if hits.is_empty() {
        return 0.0;
    }
    let nearby = hits
        .iter()
        .filter(|h| ((h.x - x).powi(2) + (h.y - y).powi(2)).sqrt() < HEAT_RADIUS)
        .count();
    (nearby as f64 / 3.0).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hits_in_set() {
        let hits = vec![Hit::new(10.0, 10.0, 1), Hit::new(20.0, 20.0, 2), Hit::new(30.0, 30.0, 1)];
        assert_eq!(hits_in_set(&hits, 1).count(), 2);
        assert_eq!(hits_in_set(&hits, 3).count(), 0);
    }

    #[test]
    fn test_heat_intensity() {
        assert_eq!(heat_intensity(&[], 50.0, 50.0), 0.0);

        let hits = vec![Hit::new(50.0, 50.0, 1), Hit::new(55.0, 50.0, 1), Hit::new(90.0, 90.0, 1)];
        let near = heat_intensity(&hits, 50.0, 50.0);
        assert!((near - 2.0 / 3.0).abs() < 1e-9);

        let crowded = vec![Hit::new(50.0, 50.0, 1); 5];
        assert_eq!(heat_intensity(&crowded, 50.0, 50.0), 1.0);
    }

    #[test]
    fn test_is_on_court() {
        assert!(Hit::new(0.0, 100.0, 1).is_on_court());
        assert!(!Hit::new(-1.0, 50.0, 1).is_on_court());
        assert!(!Hit::new(50.0, 100.5, 1).is_on_court());
        assert!(!Hit::new(f64::NAN, 50.0, 1).is_on_court());
        assert!(!Hit::new(50.0, f64::INFINITY, 1).is_on_court());
    }
}
