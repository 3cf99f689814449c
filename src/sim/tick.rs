//! Fixed timestep simulation tick
//!
//! One call advances the match by exactly one nominal frame. Inputs are
//! sampled once at the start of the tick.

use super::state::{GameEvent, GamePhase, GameState};

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Pointer position on the movement axis for the home paddle
    pub home_target: Option<f32>,
    /// Pointer position for the away paddle (local two-player only)
    pub away_target: Option<f32>,
    /// Pause toggle
    pub pause: bool,
    /// Restart after game over
    pub restart: bool,
    /// Idle/demo mode - the opponent logic drives the home paddle too
    pub idle_mode: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    if input.restart {
        state.restart();
    }
    if input.pause {
        state.toggle_pause();
    }

    match state.phase() {
        // Nothing moves, particles included; only restart gets past GameOver
        GamePhase::Paused | GamePhase::GameOver => return,
        GamePhase::ScoringDelay => {
            state.time_ticks += 1;
            state.particles.advance();
            if state.matches.advance_delay() {
                state.ball.reset(&mut state.rng);
                state.events.push(GameEvent::Served);
                log::debug!("Ball served at tick {}", state.time_ticks);
            }
            return;
        }
        GamePhase::Playing => {}
    }

    state.time_ticks += 1;

    // Pointer-driven paddles
    if !input.idle_mode {
        if let Some(target) = input.home_target {
            state.home.move_player(target);
        }
    }
    if !state.mode.away_is_ai() {
        if let Some(target) = input.away_target {
            state.away.move_player(target);
        }
    }

    let hit_color = state.hit_color;
    state.ball.update(
        [&state.home, &state.away],
        &mut state.particles,
        &mut state.rng,
        &mut state.events,
        hit_color,
    );

    // Computer-driven paddles react to where the ball is now
    let ball_coordinate = state.field.movement_axis().of(state.ball.center());
    let ball_velocity = state.field.approach_axis().of(state.ball.velocity());
    if state.mode.away_is_ai() {
        state
            .away
            .update_opponent(ball_coordinate, ball_velocity, &mut state.rng);
    }
    if input.idle_mode {
        state
            .home
            .update_opponent(ball_coordinate, ball_velocity, &mut state.rng);
    }

    state.particles.advance();

    if let Some(edge) = state.ball.exited() {
        let defender = state.field.side_at_edge(edge);
        state.award_point(defender.opponent());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::settings::Settings;
    use crate::sim::{Field, GameMode, Orientation, Particle, Side};
    use glam::Vec2;

    fn new_state(mode: GameMode) -> GameState {
        let field = Field::new(600.0, 1000.0, Orientation::Portrait).unwrap();
        GameState::new(field, mode, &Settings::default(), 12345)
    }

    /// Put the ball past the away (top) edge so the home side scores next tick
    fn send_past_away(state: &mut GameState) {
        state.ball.set_motion(Vec2::new(300.0, -50.0), Vec2::new(0.0, -6.0));
    }

    fn particles(state: &GameState) -> Vec<Particle> {
        state.particles.iter().cloned().collect()
    }

    fn assert_near(a: Vec2, b: Vec2) {
        assert!((a - b).length() < 1e-3, "{a} != {b}");
    }

    #[test]
    fn test_ball_moves_while_playing() {
        let mut state = new_state(GameMode::VsAi);
        let start = state.ball.center();
        tick(&mut state, &TickInput::default());
        assert_near(state.ball.center(), start + state.ball.velocity());
        assert_eq!(state.time_ticks, 1);
    }

    #[test]
    fn test_tick_pause() {
        let mut state = new_state(GameMode::VsAi);
        for _ in 0..5 {
            tick(&mut state, &TickInput::default());
        }
        let center = state.field.center();
        state
            .particles
            .create_explosion(center, Color::YELLOW, &mut state.rng);
        tick(&mut state, &TickInput::default());

        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause);
        assert_eq!(state.phase(), GamePhase::Paused);

        let ball = state.ball.clone();
        let (home, away) = (state.home.clone(), state.away.clone());
        let sparks = particles(&state);
        let ticks = state.time_ticks;

        let pointer = TickInput {
            home_target: Some(10.0),
            ..Default::default()
        };
        for _ in 0..30 {
            tick(&mut state, &pointer);
        }
        assert_eq!(state.ball, ball);
        assert_eq!(state.home, home);
        assert_eq!(state.away, away);
        assert_eq!(particles(&state), sparks);
        assert_eq!(state.time_ticks, ticks);

        // Unpause
        tick(&mut state, &pause);
        assert_eq!(state.phase(), GamePhase::Playing);
        assert_ne!(state.ball, ball);
        let toggles = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::Paused | GameEvent::Resumed))
            .count();
        assert_eq!(toggles, 2);
    }

    #[test]
    fn test_score_then_delay_then_serve() {
        let mut state = new_state(GameMode::VsAi);
        send_past_away(&mut state);
        tick(&mut state, &TickInput::default());

        assert_eq!(state.phase(), GamePhase::ScoringDelay);
        assert_eq!(state.matches.home_score(), 1);
        assert!(state.events.contains(&GameEvent::Scored(Side::Home)));

        let frozen_ball = state.ball.clone();
        let frozen_away = state.away.clone();
        for _ in 0..119 {
            tick(&mut state, &TickInput::default());
            assert_eq!(state.phase(), GamePhase::ScoringDelay);
            assert_eq!(state.ball, frozen_ball);
            assert_eq!(state.away, frozen_away);
        }

        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase(), GamePhase::Playing);
        assert_near(state.ball.center(), state.field.center());
        assert!(state.events.contains(&GameEvent::Served));
    }

    #[test]
    fn test_pointer_ignored_during_delay() {
        let mut state = new_state(GameMode::VsAi);
        send_past_away(&mut state);
        tick(&mut state, &TickInput::default());
        let home = state.home.clone();
        tick(
            &mut state,
            &TickInput {
                home_target: Some(0.0),
                ..Default::default()
            },
        );
        assert_eq!(state.home, home);
    }

    #[test]
    fn test_five_points_end_the_match() {
        let mut state = new_state(GameMode::VsAi);
        let mut delays = 0;
        for _ in 0..5 {
            send_past_away(&mut state);
            tick(&mut state, &TickInput::default());
            if state.phase() == GamePhase::ScoringDelay {
                delays += 1;
                while state.phase() == GamePhase::ScoringDelay {
                    tick(&mut state, &TickInput::default());
                }
            }
        }

        assert_eq!(delays, 4);
        assert_eq!(state.phase(), GamePhase::GameOver);
        assert_eq!(state.matches.home_score(), 5);
        let events = state.drain_events();
        let game_overs = events
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { winner: Side::Home }))
            .count();
        assert_eq!(game_overs, 1);

        // Ball, paddles and the celebration burst are all frozen
        let ball = state.ball.clone();
        let home = state.home.clone();
        let sparks = particles(&state);
        assert!(sparks.len() >= 15);
        for _ in 0..30 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.ball, ball);
        assert_eq!(state.home, home);
        assert_eq!(particles(&state), sparks);
    }

    #[test]
    fn test_game_over_burst_stays_on_screen() {
        let field = Field::new(600.0, 1000.0, Orientation::Portrait).unwrap();
        let settings = Settings {
            winning_score: 1,
            ..Default::default()
        };
        let mut state = GameState::new(field, GameMode::VsAi, &settings, 8);
        send_past_away(&mut state);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase(), GamePhase::GameOver);

        let burst: Vec<(Vec2, u8)> = state.particles.iter().map(|p| (p.pos, p.alpha)).collect();
        assert_eq!(burst.len(), 15);
        assert!(burst.iter().all(|&(pos, alpha)| pos == field.center() && alpha == 255));

        for _ in 0..30 {
            tick(&mut state, &TickInput::default());
        }
        let after: Vec<(Vec2, u8)> = state.particles.iter().map(|p| (p.pos, p.alpha)).collect();
        assert_eq!(after, burst);
    }

    #[test]
    fn test_degenerate_field_double_overlap_does_not_panic() {
        // Paddles 0.25 thick at y 0.5 and 9.25; the 10 unit ball spans both
        let field = Field::new(600.0, 10.0, Orientation::Portrait).unwrap();
        let mut state = GameState::new(field, GameMode::VsAi, &Settings::default(), 5);
        state.ball.set_motion(Vec2::new(300.0, 5.0), Vec2::new(4.0, 6.0));
        tick(&mut state, &TickInput::default());
        let hits: Vec<GameEvent> = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::PaddleHit(_)))
            .collect();
        assert_eq!(hits, vec![GameEvent::PaddleHit(Side::Home), GameEvent::PaddleHit(Side::Away)]);

        for _ in 0..200 {
            tick(&mut state, &TickInput::default());
        }
        assert!(state.ball.velocity().is_finite());
    }

    #[test]
    fn test_restart_after_game_over() {
        let field = Field::new(600.0, 1000.0, Orientation::Portrait).unwrap();
        let settings = Settings {
            winning_score: 1,
            ..Default::default()
        };
        let mut state = GameState::new(field, GameMode::VsAi, &settings, 3);
        send_past_away(&mut state);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase(), GamePhase::GameOver);

        let restart = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut state, &restart);
        assert_eq!(state.phase(), GamePhase::Playing);
        assert_eq!(state.matches.home_score(), 0);
        assert!(state.events.contains(&GameEvent::Restarted));

        // Restart while playing is a no-op
        let scores = state.matches.clone();
        tick(&mut state, &restart);
        assert_eq!(state.matches, scores);
    }

    #[test]
    fn test_two_player_routes_away_pointer() {
        let mut state = new_state(GameMode::LocalTwoPlayer);
        let input = TickInput {
            home_target: Some(100.0),
            away_target: Some(500.0),
            ..Default::default()
        };
        tick(&mut state, &input);
        assert_eq!(state.home.center(), 100.0);
        assert_eq!(state.away.center(), 500.0);
    }

    #[test]
    fn test_vs_ai_ignores_away_pointer() {
        let mut state = new_state(GameMode::VsAi);
        let before = state.away.center();
        let input = TickInput {
            away_target: Some(500.0),
            ..Default::default()
        };
        tick(&mut state, &input);
        // The opponent moves at most one step per tick
        assert!((state.away.center() - before).abs() <= 600.0 / 60.0);
    }

    #[test]
    fn test_idle_mode_drives_home_paddle() {
        let mut state = new_state(GameMode::VsAi);
        // Heading down toward the home paddle, far to the left
        state
            .ball
            .set_motion(Vec2::new(40.0, 500.0), Vec2::new(0.0, 6.0));
        let input = TickInput {
            home_target: Some(590.0),
            idle_mode: true,
            ..Default::default()
        };
        for _ in 0..10 {
            tick(&mut state, &input);
        }
        assert!(state.home.center() < 300.0);
    }

    #[test]
    fn test_determinism() {
        let mut state1 = new_state(GameMode::VsAi);
        let mut state2 = new_state(GameMode::VsAi);

        let inputs = [
            TickInput {
                home_target: Some(120.0),
                ..Default::default()
            },
            TickInput::default(),
            TickInput {
                home_target: Some(480.0),
                ..Default::default()
            },
            TickInput {
                idle_mode: true,
                ..Default::default()
            },
        ];

        for _ in 0..100 {
            for input in &inputs {
                tick(&mut state1, input);
                tick(&mut state2, input);
            }
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.ball, state2.ball);
        assert_eq!(state1.away, state2.away);
        assert_eq!(state1.matches, state2.matches);
    }
}
