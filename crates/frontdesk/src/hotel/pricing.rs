use chrono::{Duration, NaiveDate};
use serde::Serialize;

use super::domain::{PriceRuleId, RateAdjustment, Room, Season, SeasonPriceRule};

/// Error raised when a stay cannot be priced.
#[derive(Debug, thiserror::Error)]
pub enum PricingError {
    #[error("stay must cover at least one night ({check_in} -> {check_out})")]
    EmptyStay {
        check_in: NaiveDate,
        check_out: NaiveDate,
    },
}

/// The rule that won a given night, kept on the quote for auditing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppliedRule {
    pub rule_id: PriceRuleId,
    pub season: String,
    pub adjustment: RateAdjustment,
}

/// One night of a quoted stay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NightRate {
    pub date: NaiveDate,
    pub rate_cents: u32,
    /// `None` means the room's base rate applied.
    pub applied: Option<AppliedRule>,
}

/// Priced stay with a per-night breakdown so desk staff can explain a total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StayQuote {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub nights: Vec<NightRate>,
    pub total_cents: u32,
}

impl StayQuote {
    pub fn nights_count(&self) -> usize {
        self.nights.len()
    }
}

/// Price a half-open stay for `room`, walking night by night.
///
/// Per night, the candidate rules are those whose season covers the date and
/// whose room type matches. The winner is picked by priority; on a priority
/// tie an override beats a multiplier, and the lowest rule id settles what
/// remains. Nights with no candidate fall back to the base rate.
pub fn quote_stay(
    room: &Room,
    check_in: NaiveDate,
    check_out: NaiveDate,
    seasons: &[Season],
    rules: &[SeasonPriceRule],
) -> Result<StayQuote, PricingError> {
    if check_in >= check_out {
        return Err(PricingError::EmptyStay {
            check_in,
            check_out,
        });
    }

    let mut nights = Vec::with_capacity((check_out - check_in).num_days() as usize);
    let mut total: u64 = 0;

    let mut night = check_in;
    while night < check_out {
        let winner = rules
            .iter()
            .filter(|rule| rule.room_type == room.room_type)
            .filter_map(|rule| {
                seasons
                    .iter()
                    .find(|season| season.id == rule.season_id && season.covers(night))
                    .map(|season| (rule, season))
            })
            .max_by_key(|&(rule, _)| (rule.priority, adjustment_rank(rule), reversed_id(rule)));

        let (rate_cents, applied) = match winner {
            Some((rule, season)) => (
                apply_adjustment(room.nightly_rate_cents, rule.adjustment),
                Some(AppliedRule {
                    rule_id: rule.id,
                    season: season.name.clone(),
                    adjustment: rule.adjustment,
                }),
            ),
            None => (room.nightly_rate_cents, None),
        };

        total += u64::from(rate_cents);
        nights.push(NightRate {
            date: night,
            rate_cents,
            applied,
        });
        night += Duration::days(1);
    }

    Ok(StayQuote {
        check_in,
        check_out,
        nights,
        total_cents: total.min(u64::from(u32::MAX)) as u32,
    })
}

fn apply_adjustment(base_cents: u32, adjustment: RateAdjustment) -> u32 {
    match adjustment {
        RateAdjustment::NightlyOverride { rate_cents } => rate_cents,
        RateAdjustment::Multiplier { factor } => {
            let scaled = (f64::from(base_cents) * factor).round();
            scaled.clamp(0.0, f64::from(u32::MAX)) as u32
        }
    }
}

const fn adjustment_rank(rule: &SeasonPriceRule) -> u8 {
    match rule.adjustment {
        RateAdjustment::NightlyOverride { .. } => 1,
        RateAdjustment::Multiplier { .. } => 0,
    }
}

// max_by_key keeps the last maximum; reversing the id makes the lowest id win.
fn reversed_id(rule: &SeasonPriceRule) -> u64 {
    u64::MAX - rule.id.0
}
