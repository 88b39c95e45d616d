//! Scoring of finished runs

use crate::run_mon::TelemetryRecord;

/// Score given to runs which did not reach the goal.
pub const FAILED_RUN_SCORE: f64 = -1.0;

/// Out of bounds score of a run: the summed out of bounds ratio per 100 m of road.
///
/// Higher scores mean the agent spent more of the run outside its lane. Runs which did not reach
/// the goal, or roads with no length, score [`FAILED_RUN_SCORE`].
pub fn oob_score(tm: &TelemetryRecord) -> f64 {
    if !tm.success || !(tm.length > 0.0) {
        return FAILED_RUN_SCORE;
    }

    tm.out_of_bounds.iter().sum::<f64>() / tm.length * 100.0
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    fn record(success: bool, out_of_bounds: Vec<f64>) -> TelemetryRecord {
        TelemetryRecord {
            name: String::from("scored"),
            length: 200.0,
            n_points: 2,
            points: vec![[0.0; 3], [200.0, 0.0, 0.0]],
            tick_interval: 0.1,
            speed_limit: 13.4112,
            risk_value: 0.5,
            finish: String::new(),
            success,
            out_of_bounds,
            position: vec![],
            velocity: vec![],
        }
    }

    #[test]
    fn test_oob_score() {
        assert_relative_eq!(oob_score(&record(true, vec![0.0, 0.5, 1.0, 0.5])), 1.0);
        assert_eq!(oob_score(&record(true, vec![0.0; 10])), 0.0);
        assert_eq!(oob_score(&record(false, vec![1.0; 10])), FAILED_RUN_SCORE);
    }
}
