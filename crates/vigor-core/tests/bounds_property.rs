//! Property tests for reward bounds, zone ordering and risk monotonicity.

use proptest::prelude::*;
use vigor_core::flow::FlowZone;
use vigor_core::{rng, FlowAssessor, RewardOptions, RewardScheduler, StreakRiskEngine, UserContext};

fn arb_user() -> impl Strategy<Value = UserContext> {
    (
        0.0f64..=1.0,
        0u32..400,
        0.0f64..=1.0,
        0.0f64..500.0,
        0u32..200,
        0.0f64..=10.0,
    )
        .prop_map(
            |(recent_engagement, streak_length, task_completion_rate, hours, user_level, skill)| {
                UserContext {
                    recent_engagement,
                    streak_length,
                    task_completion_rate,
                    hours_since_last_reward: hours,
                    user_level,
                    skill_level: skill,
                    ..Default::default()
                }
            },
        )
}

fn zone_rank(zone: FlowZone) -> u8 {
    match zone {
        FlowZone::Boredom => 0,
        FlowZone::Flow => 1,
        FlowZone::Anxiety => 2,
    }
}

proptest! {
    #[test]
    fn reward_within_band(
        base in 0.0f64..100_000.0,
        user in arb_user(),
        adaptive in any::<bool>(),
        seed in any::<u64>(),
    ) {
        let scheduler = RewardScheduler::new();
        let mut rng = rng::seeded(seed);
        let options = RewardOptions { adaptive_adjustment: adaptive, suppress_bonus: false };
        let result = scheduler.calculate_variable_reward(base, &user, &options, &mut rng).unwrap();

        prop_assert!(result.final_xp >= 0.8 * base);
        prop_assert!(result.final_xp <= 3.0 * base);
        prop_assert!((0.0..=1.0).contains(&result.engagement_prediction));
        prop_assert!(result.mathematical_optimality > 0.8 && result.mathematical_optimality <= 1.0);
    }

    #[test]
    fn bonus_probability_stays_in_bounds(user in arb_user(), adaptive in any::<bool>()) {
        let scheduler = RewardScheduler::new();
        let options = RewardOptions { adaptive_adjustment: adaptive, suppress_bonus: false };
        let p = scheduler.bonus_probability(&user, &options);
        prop_assert!((0.05..=0.25).contains(&p));
    }

    #[test]
    fn harder_tasks_never_move_toward_boredom(
        skill in 0.5f64..=10.0,
        a in 0.0f64..=10.0,
        b in 0.0f64..=10.0,
    ) {
        let assessor = FlowAssessor::new();
        let (easy, hard) = if a <= b { (a, b) } else { (b, a) };
        let easy_zone = assessor.assess_flow_state(skill, easy, None).unwrap().flow_zone_status;
        let hard_zone = assessor.assess_flow_state(skill, hard, None).unwrap().flow_zone_status;
        prop_assert!(zone_rank(easy_zone) <= zone_rank(hard_zone));
    }

    #[test]
    fn flow_outputs_stay_in_range(skill in 0.5f64..=10.0, difficulty in 0.0f64..=10.0) {
        let metrics = FlowAssessor::new().assess_flow_state(skill, difficulty, None).unwrap();
        prop_assert!((0.0..=1.0).contains(&metrics.flow_score));
        prop_assert!((0.0..=10.0).contains(&metrics.next_task_difficulty));
        prop_assert!((metrics.next_task_difficulty - difficulty).abs() <= 1.5 + 0.05);
    }

    #[test]
    fn risk_never_rises_with_more_time_left(a in 0.0f64..48.0, b in 0.0f64..48.0) {
        let engine = StreakRiskEngine::new();
        let (sooner, later) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(engine.risk_for_hours(sooner) >= engine.risk_for_hours(later));
    }
}
