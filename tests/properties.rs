use dino_jump::GameConfig;
use dino_jump::sim::{
    Character, Difficulty, GamePhase, GameState, Obstacle, ObstacleKind, Rect, ScriptedSource,
    TickInput, sample_interval, score_tick, tick,
};
use proptest::prelude::*;

fn rect() -> impl Strategy<Value = Rect> {
    (-500.0f32..500.0, -500.0f32..500.0, 0.0f32..300.0, 0.0f32..300.0)
        .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
}

fn running(config: &GameConfig) -> GameState {
    let mut state = GameState::new(config);
    state.phase = GamePhase::Running;
    state
}

proptest! {
    #[test]
    fn overlap_is_symmetric(a in rect(), b in rect()) {
        prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
    }

    #[test]
    fn separated_rects_never_overlap(a in rect(), gap in 0.0f32..100.0, h in 1.0f32..300.0) {
        let right_of = Rect::new(a.right() + gap, a.top(), 50.0, h);
        let below = Rect::new(a.left(), a.bottom() + gap, 50.0, h);
        prop_assert!(!a.overlaps(&right_of));
        prop_assert!(!a.overlaps(&below));
    }

    #[test]
    fn zero_area_rect_never_overlaps(a in rect(), x in -500.0f32..500.0, y in -500.0f32..500.0,
                                     extent in 0.0f32..300.0, flat in any::<bool>()) {
        let degenerate = if flat {
            Rect::new(x, y, extent, 0.0)
        } else {
            Rect::new(x, y, 0.0, extent)
        };
        prop_assert!(!a.overlaps(&degenerate));
        prop_assert!(!degenerate.overlaps(&a));
    }

    #[test]
    fn identical_rects_overlap(x in -500.0f32..500.0, y in -500.0f32..500.0,
                               w in 1.0f32..300.0, h in 1.0f32..300.0) {
        let a = Rect::new(x, y, w, h);
        prop_assert!(a.overlaps(&a));
    }

    #[test]
    fn jump_arc_descends_after_apex_and_clamps(gravity in 0.25f32..4.0, launch in -40.0f32..-2.0) {
        let ground = 220.0;
        let mut character = Character::grounded(50.0, ground, 130.0, 130.0);
        prop_assert!(character.launch(launch));

        let mut previous_y = character.pos.y;
        let mut past_apex = false;
        let mut frames = 0;
        loop {
            frames += 1;
            prop_assert!(frames < 10_000);
            let landed = character.integrate(gravity, ground);
            prop_assert!(character.pos.y <= ground);
            if past_apex {
                prop_assert!(character.pos.y >= previous_y);
            }
            if character.velocity >= 0.0 {
                past_apex = true;
            }
            previous_y = character.pos.y;
            if landed {
                break;
            }
        }
        prop_assert_eq!(character.pos.y, ground);
        prop_assert_eq!(character.velocity, 0.0);
        prop_assert!(!character.airborne);
    }

    #[test]
    fn prune_keeps_exactly_on_screen_obstacles(xs in prop::collection::vec(-200.0f32..900.0, 0..20)) {
        let config = GameConfig::default();
        let mut state = running(&config);
        state.last_spawn_ms = Some(0.0);
        for &x in &xs {
            state.obstacles.push(Obstacle::on_ground(ObstacleKind::Regular, x, 80.0, 50.0, 350.0));
        }

        let speed = state.difficulty.speed;
        let expected: Vec<f32> = xs
            .iter()
            .map(|x| x - speed)
            .filter(|x| x + 80.0 >= 0.0)
            .collect();

        let mut source = ScriptedSource::new([0.5]);
        tick(&mut state, &TickInput { timestamp_ms: 0.0, jump: false }, &config, &mut source);

        let kept: Vec<f32> = state.obstacles.iter().map(|o| o.pos.x).collect();
        prop_assert_eq!(kept, expected);
    }

    #[test]
    fn score_counts_only_while_running(before in 0u32..400, after in 0u32..400) {
        let config = GameConfig::default();
        let mut state = running(&config);
        for _ in 0..before {
            score_tick(&mut state, &config);
        }
        prop_assert_eq!(state.score, before);

        state.phase = GamePhase::GameOver;
        for _ in 0..after {
            score_tick(&mut state, &config);
        }
        prop_assert_eq!(state.score, before);
    }

    #[test]
    fn difficulty_only_gets_harder(ticks in 0u32..5000) {
        let config = GameConfig::default();
        let mut state = running(&config);
        let mut last = state.difficulty;
        let mut last_interval = state.spawn_interval_ms;

        for _ in 0..ticks {
            score_tick(&mut state, &config);
            let d = state.difficulty;
            prop_assert!(d.speed >= last.speed);
            prop_assert!(d.spawn_min_ms <= last.spawn_min_ms);
            prop_assert!(d.spawn_max_ms <= last.spawn_max_ms);
            prop_assert!(d.spawn_min_ms >= config.spawn_interval_floor_ms);
            prop_assert!(state.spawn_interval_ms <= last_interval);
            last = d;
            last_interval = state.spawn_interval_ms;
        }
        prop_assert_eq!(state.difficulty.level, ticks / config.difficulty_threshold);
    }

    #[test]
    fn sampled_interval_within_bounds(unit in 0.0f32..1.0, steps in 0u32..30) {
        let config = GameConfig::default();
        let mut difficulty = Difficulty::base(&config);
        for _ in 0..steps {
            difficulty.step(&config);
        }
        let interval = sample_interval(unit, &difficulty);
        prop_assert!(interval >= difficulty.spawn_min_ms);
        prop_assert!(interval <= difficulty.spawn_max_ms);
        if difficulty.spawn_max_ms > difficulty.spawn_min_ms {
            prop_assert!(interval < difficulty.spawn_max_ms);
        }
    }
}
