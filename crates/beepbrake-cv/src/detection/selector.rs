//! Candidate selection

use beepbrake_core::Candidate;
use tracing::debug;

/// Pick the largest candidate by area
///
/// Only a strictly larger area replaces the current pick, so the first of
/// several equal maxima wins. Rectangles without positive area never win.
pub fn select_largest(candidates: &[Candidate]) -> Option<Candidate> {
    let mut largest = 0;
    let mut current = None;

    for candidate in candidates {
        let area = candidate.area();
        if largest < area {
            largest = area;
            current = Some(*candidate);
        }
    }

    if let Some(found) = &current {
        debug!(size = %found.size(), "selected largest candidate");
    }

    current
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        assert_eq!(select_largest(&[]), None);
    }

    #[test]
    fn test_first_maximum_wins() {
        let candidates = [
            Candidate::new(0, 0, 10, 10),
            Candidate::new(5, 5, 12, 12),
            Candidate::new(50, 50, 12, 12),
        ];

        assert_eq!(select_largest(&candidates), Some(candidates[1]));
    }

    #[test]
    fn test_order_independent_of_position() {
        let candidates = [
            Candidate::new(100, 100, 30, 30),
            Candidate::new(0, 0, 5, 5),
            Candidate::new(1, 1, 20, 40),
        ];

        assert_eq!(select_largest(&candidates), Some(candidates[0]));
    }

    #[test]
    fn test_zero_area_never_selected() {
        let candidates = [Candidate::new(0, 0, 0, 10), Candidate::new(4, 4, 10, 0)];
        assert_eq!(select_largest(&candidates), None);
    }
}
