//! CD positions and the fixed-size maturity ladder

use crate::config::InflationAdjustment;
use crate::error::SimError;

/// A single certificate of deposit: purchased at a discount, redeemed at
/// face value in its maturity year
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cd {
    /// Calendar year purchased
    pub issue_year: i32,

    /// Calendar year it redeems, strictly after the issue year
    pub maturity_year: i32,

    /// Amount paid out at maturity
    pub face_value: f64,
}

impl Cd {
    pub fn tenor_years(&self) -> u32 {
        (self.maturity_year - self.issue_year) as u32
    }
}

/// Ordered set of CDs with staggered maturities spanning a fixed horizon
///
/// Holds exactly `size` CDs with distinct, strictly increasing maturities at
/// all times except between the yearly redemption and re-issuance.
#[derive(Debug, Clone)]
pub struct Ladder {
    rungs: Vec<Cd>,
    size: usize,
}

impl Ladder {
    /// Build a full ladder with maturities `start_year+1 ..= start_year+N`,
    /// each face value sized to the (optionally escalated) consumption
    /// target for its maturity year
    pub fn initialize(
        start_year: i32,
        horizon_length: u32,
        target_consumption: f64,
        inflation: &InflationAdjustment,
    ) -> Result<Self, SimError> {
        if horizon_length < 1 {
            return Err(SimError::Configuration(
                "ladder horizon must be at least 1 year".into(),
            ));
        }

        let rungs = (1..=horizon_length)
            .map(|years_out| Cd {
                issue_year: start_year,
                maturity_year: start_year + years_out as i32,
                face_value: target_consumption * inflation.factor(years_out),
            })
            .collect();

        Ok(Self {
            rungs,
            size: horizon_length as usize,
        })
    }

    /// Remove and return the CD maturing in `current_year`
    ///
    /// Absence of such a CD is an engine defect, not a market outcome.
    pub fn redeem_maturing(&mut self, current_year: i32) -> Result<Cd, SimError> {
        let position = self
            .rungs
            .iter()
            .position(|cd| cd.maturity_year == current_year)
            .ok_or_else(|| {
                SimError::LadderIntegrity(format!(
                    "no CD matures in {}, ladder spans {:?}",
                    current_year,
                    self.maturity_span()
                ))
            })?;
        Ok(self.rungs.remove(position))
    }

    /// Insert a newly purchased CD, which must extend the ladder by exactly
    /// one rung following a redemption
    pub fn issue(
        &mut self,
        issue_year: i32,
        maturity_year: i32,
        face_value: f64,
    ) -> Result<(), SimError> {
        if self.rungs.len() != self.size - 1 {
            return Err(SimError::LadderIntegrity(format!(
                "issuance requires exactly {} held CDs, found {}",
                self.size - 1,
                self.rungs.len()
            )));
        }
        if let Some(last) = self.rungs.last() {
            if maturity_year <= last.maturity_year {
                return Err(SimError::LadderIntegrity(format!(
                    "new maturity {} must extend the ladder past {}",
                    maturity_year, last.maturity_year
                )));
            }
        }
        if maturity_year <= issue_year {
            return Err(SimError::LadderIntegrity(format!(
                "maturity {} must follow issue year {}",
                maturity_year, issue_year
            )));
        }

        self.rungs.push(Cd {
            issue_year,
            maturity_year,
            face_value,
        });
        Ok(())
    }

    /// Sum of held face values, used for net-worth reporting
    pub fn total_face_value(&self) -> f64 {
        self.rungs.iter().map(|cd| cd.face_value).sum()
    }

    pub fn len(&self) -> usize {
        self.rungs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rungs.is_empty()
    }

    /// Configured ladder size (the run horizon)
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn rungs(&self) -> impl Iterator<Item = &Cd> {
        self.rungs.iter()
    }

    fn maturity_span(&self) -> Option<(i32, i32)> {
        match (self.rungs.first(), self.rungs.last()) {
            (Some(first), Some(last)) => Some((first.maturity_year, last.maturity_year)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn test_ladder() -> Ladder {
        Ladder::initialize(2000, 5, 10_000.0, &InflationAdjustment::None).unwrap()
    }

    #[test]
    fn test_initialize_spans_horizon() {
        let ladder = test_ladder();
        assert_eq!(ladder.len(), 5);

        let maturities: Vec<i32> = ladder.rungs().map(|cd| cd.maturity_year).collect();
        assert_eq!(maturities, vec![2001, 2002, 2003, 2004, 2005]);
        assert!(ladder.rungs().all(|cd| cd.issue_year == 2000));
        assert_relative_eq!(ladder.total_face_value(), 50_000.0);
    }

    #[test]
    fn test_initialize_zero_horizon_rejected() {
        let result = Ladder::initialize(2000, 0, 10_000.0, &InflationAdjustment::None);
        assert!(matches!(result, Err(SimError::Configuration(_))));
    }

    #[test]
    fn test_inflation_adjusted_faces() {
        let ladder =
            Ladder::initialize(2000, 3, 10_000.0, &InflationAdjustment::FixedRate(0.025)).unwrap();
        let faces: Vec<f64> = ladder.rungs().map(|cd| cd.face_value).collect();
        assert_relative_eq!(faces[0], 10_000.0 * 1.025);
        assert_relative_eq!(faces[1], 10_000.0 * 1.025f64.powi(2));
        assert_relative_eq!(faces[2], 10_000.0 * 1.025f64.powi(3));
    }

    #[test]
    fn test_redeem_then_issue_keeps_size() {
        let mut ladder = test_ladder();

        let cd = ladder.redeem_maturing(2001).unwrap();
        assert_eq!(cd.maturity_year, 2001);
        assert_relative_eq!(cd.face_value, 10_000.0);
        assert_eq!(ladder.len(), 4);

        ladder.issue(2001, 2006, 10_000.0).unwrap();
        assert_eq!(ladder.len(), 5);
        let maturities: Vec<i32> = ladder.rungs().map(|cd| cd.maturity_year).collect();
        assert_eq!(maturities, vec![2002, 2003, 2004, 2005, 2006]);
    }

    #[test]
    fn test_redeem_missing_year_is_integrity_error() {
        let mut ladder = test_ladder();
        assert!(matches!(
            ladder.redeem_maturing(2010),
            Err(SimError::LadderIntegrity(_))
        ));
    }

    #[test]
    fn test_issue_on_full_ladder_is_integrity_error() {
        let mut ladder = test_ladder();
        assert!(matches!(
            ladder.issue(2000, 2006, 10_000.0),
            Err(SimError::LadderIntegrity(_))
        ));
    }

    #[test]
    fn test_issue_duplicate_maturity_is_integrity_error() {
        let mut ladder = test_ladder();
        ladder.redeem_maturing(2001).unwrap();
        assert!(matches!(
            ladder.issue(2001, 2005, 10_000.0),
            Err(SimError::LadderIntegrity(_))
        ));
    }
}
