//! Player states
//!
//! Timed states read their length from the animator so that exits line up
//! with the clip; unknown clips use the fallbacks below. Most of them leave
//! at 95% of the clip, into `Move` or `Idle` depending on the intent.

use crate::frame::{ActorFrame, Strike};
use crate::player::PlayerBody;
use rift_ai::{State, StateMachine, Transition};
use rift_math::Vec3;

/// Fraction of a clip after which a timed state hands over
const END_RATIO: f32 = 0.95;
const MIN_CLIP: f32 = 0.05;

const ROLL_FALLBACK: f32 = 0.45;
const ROLL_MOVE_RATIO: f32 = 0.55;
const ROLL_SPEED_FACTOR: f32 = 1.25;

const ATTACK_FALLBACK: f32 = 0.6;
const COMBO_WINDOW: (f32, f32) = (0.20, 0.65);

const SKILL_FALLBACK: f32 = 0.8;
const HURT_FALLBACK: f32 = 0.35;
const DEAD_FALLBACK: f32 = 1.0;
const DEAD_MIN: f32 = 0.5;

/// Ignore ground contact this long after takeoff
const JUMP_GUARD: f32 = 0.08;
/// Accept landing after this long even if takeoff was never observed
const JUMP_TAKEOFF_GRACE: f32 = 0.35;

pub(crate) fn register(fsm: &mut StateMachine<PlayerBody, ActorFrame>) {
    fsm.register(Idle);
    fsm.register(Move);
    fsm.register(Jump::default());
    fsm.register(Roll::default());
    fsm.register(Attack::new(1));
    fsm.register(Attack::new(2));
    fsm.register(Attack::new(3));
    fsm.register(Skill::default());
    fsm.register(Hurt::default());
    fsm.register(Dead::default());
}

#[derive(Debug)]
pub struct Idle;

impl State<PlayerBody, ActorFrame> for Idle {
    fn name(&self) -> &'static str {
        "Idle"
    }

    fn on_enter(&mut self, body: &mut PlayerBody, _frame: &mut ActorFrame) {
        body.motion.stop_horizontal();
        body.play("idle", true);
    }

    fn on_update(&mut self, body: &mut PlayerBody, _frame: &mut ActorFrame, _dt: f32) -> Transition {
        if body.intent.is_moving() {
            return Transition::To("Move");
        }
        Transition::Stay
    }
}

/// Walk or run along the intent
#[derive(Debug)]
pub struct Move;

impl Move {
    fn drive(body: &mut PlayerBody, dt: f32) -> bool {
        let Some(dir) = body.intent.horizontal() else {
            return false;
        };
        let (speed, clip) = if body.intent.run {
            (body.profile.run_speed, "run")
        } else {
            (body.profile.move_speed, "walk")
        };
        body.motion.set_horizontal(dir * speed);
        body.transform.turn_toward(dir, body.profile.rotate_speed * dt);
        body.play(clip, true);
        true
    }
}

impl State<PlayerBody, ActorFrame> for Move {
    fn name(&self) -> &'static str {
        "Move"
    }

    fn on_enter(&mut self, body: &mut PlayerBody, _frame: &mut ActorFrame) {
        Self::drive(body, 0.0);
    }

    fn on_update(&mut self, body: &mut PlayerBody, _frame: &mut ActorFrame, dt: f32) -> Transition {
        if !Self::drive(body, dt) {
            body.motion.stop_horizontal();
            return Transition::To("Idle");
        }
        Transition::Stay
    }

    fn on_exit(&mut self, body: &mut PlayerBody, _frame: &mut ActorFrame) {
        body.motion.stop_horizontal();
    }
}

/// Airborne until the ground is touched again
#[derive(Debug, Default)]
pub struct Jump {
    timer: f32,
    left_ground: bool,
}

impl State<PlayerBody, ActorFrame> for Jump {
    fn name(&self) -> &'static str {
        "Jump"
    }

    fn on_enter(&mut self, body: &mut PlayerBody, _frame: &mut ActorFrame) {
        self.timer = 0.0;
        self.left_ground = false;
        body.play("jump", false);
    }

    fn on_update(&mut self, body: &mut PlayerBody, _frame: &mut ActorFrame, dt: f32) -> Transition {
        self.timer += dt;
        if self.timer < JUMP_GUARD {
            return Transition::Stay;
        }

        if !self.left_ground {
            self.left_ground = !body.motion.grounded;
            if !self.left_ground && self.timer < JUMP_TAKEOFF_GRACE {
                return Transition::Stay;
            }
        }

        if body.motion.grounded {
            return Transition::To(body.locomotion_state());
        }
        Transition::Stay
    }
}

/// Short dash along the intent, or forward without one
#[derive(Debug, Default)]
pub struct Roll {
    timer: f32,
    duration: f32,
    stopped: bool,
}

impl State<PlayerBody, ActorFrame> for Roll {
    fn name(&self) -> &'static str {
        "Roll"
    }

    fn on_enter(&mut self, body: &mut PlayerBody, _frame: &mut ActorFrame) {
        self.timer = 0.0;
        self.stopped = false;
        body.play("roll", false);
        self.duration = body.animator.duration_or("roll", ROLL_FALLBACK, MIN_CLIP);

        let dir = body.intent.horizontal().unwrap_or_else(|| {
            let forward = body.transform.forward();
            if forward.length_squared() > 1e-6 {
                forward.normalize()
            } else {
                Vec3::Z
            }
        });
        body.motion.set_horizontal(dir * body.profile.run_speed * ROLL_SPEED_FACTOR);
    }

    fn on_update(&mut self, body: &mut PlayerBody, _frame: &mut ActorFrame, dt: f32) -> Transition {
        self.timer += dt;

        if !self.stopped && self.timer >= ROLL_MOVE_RATIO * self.duration {
            body.motion.stop_horizontal();
            self.stopped = true;
        }
        if self.timer >= END_RATIO * self.duration {
            return Transition::To(body.locomotion_state());
        }
        Transition::Stay
    }

    fn on_exit(&mut self, body: &mut PlayerBody, _frame: &mut ActorFrame) {
        body.motion.stop_horizontal();
    }
}

/// One step of the light-attack combo
#[derive(Debug)]
pub struct Attack {
    step: u8,
    timer: f32,
    duration: f32,
    queued_next: bool,
    swung: bool,
}

impl Attack {
    pub fn new(step: u8) -> Self {
        Self {
            step: step.clamp(1, 3),
            timer: 0.0,
            duration: ATTACK_FALLBACK,
            queued_next: false,
            swung: false,
        }
    }

    fn clip(&self) -> &'static str {
        match self.step {
            1 => "attack1",
            2 => "attack2",
            _ => "attack3",
        }
    }

    fn next(&self) -> Option<&'static str> {
        match self.step {
            1 => Some("Attack2"),
            2 => Some("Attack3"),
            _ => None,
        }
    }

    /// Hit time as a fraction of the clip, and how long after it the hit may still land
    fn hit_timing(&self) -> (f32, f32) {
        match self.step {
            1 => (0.35, 0.08),
            2 => (0.45, 0.12),
            _ => (0.40, 0.15),
        }
    }
}

impl State<PlayerBody, ActorFrame> for Attack {
    fn name(&self) -> &'static str {
        match self.step {
            1 => "Attack1",
            2 => "Attack2",
            _ => "Attack3",
        }
    }

    fn on_enter(&mut self, body: &mut PlayerBody, _frame: &mut ActorFrame) {
        self.timer = 0.0;
        self.queued_next = false;
        self.swung = false;
        body.motion.stop_horizontal();
        body.play(self.clip(), false);
        self.duration = body.animator.duration_or(self.clip(), ATTACK_FALLBACK, MIN_CLIP);
    }

    fn on_update(&mut self, body: &mut PlayerBody, frame: &mut ActorFrame, dt: f32) -> Transition {
        self.timer += dt;

        let (ratio, window) = self.hit_timing();
        let hit_time = ratio * self.duration;
        if !self.swung && self.timer >= hit_time && self.timer <= hit_time + window {
            self.swung = true;
            frame.strike(Strike::Melee);
        }

        let (open, close) = COMBO_WINDOW;
        if self.timer >= open * self.duration && self.timer <= close * self.duration && body.consume_combo() {
            self.queued_next = true;
        }

        if self.timer >= END_RATIO * self.duration {
            if self.queued_next {
                if let Some(next) = self.next() {
                    return Transition::To(next);
                }
            }
            return Transition::To(body.locomotion_state());
        }
        Transition::Stay
    }
}

#[derive(Debug, Default)]
pub struct Skill {
    timer: f32,
    duration: f32,
}

impl State<PlayerBody, ActorFrame> for Skill {
    fn name(&self) -> &'static str {
        "Skill"
    }

    fn on_enter(&mut self, body: &mut PlayerBody, _frame: &mut ActorFrame) {
        self.timer = 0.0;
        body.motion.stop_horizontal();
        body.play("skill", false);
        self.duration = body.animator.duration_or("skill", SKILL_FALLBACK, MIN_CLIP);
    }

    fn on_update(&mut self, body: &mut PlayerBody, _frame: &mut ActorFrame, dt: f32) -> Transition {
        self.timer += dt;
        if self.timer >= END_RATIO * self.duration {
            return Transition::To(body.locomotion_state());
        }
        Transition::Stay
    }
}

#[derive(Debug, Default)]
pub struct Hurt {
    timer: f32,
    duration: f32,
}

impl State<PlayerBody, ActorFrame> for Hurt {
    fn name(&self) -> &'static str {
        "Hurt"
    }

    fn on_enter(&mut self, body: &mut PlayerBody, _frame: &mut ActorFrame) {
        self.timer = 0.0;
        body.motion.stop_horizontal();
        body.play("hurt", false);
        self.duration = body.animator.duration_or("hurt", HURT_FALLBACK, MIN_CLIP);
    }

    fn on_update(&mut self, body: &mut PlayerBody, _frame: &mut ActorFrame, dt: f32) -> Transition {
        self.timer += dt;
        if self.timer >= END_RATIO * self.duration {
            return Transition::To(body.locomotion_state());
        }
        Transition::Stay
    }
}

/// Terminal until respawn
#[derive(Debug, Default)]
pub struct Dead {
    timer: f32,
    duration: f32,
}

impl State<PlayerBody, ActorFrame> for Dead {
    fn name(&self) -> &'static str {
        "Dead"
    }

    fn on_enter(&mut self, body: &mut PlayerBody, _frame: &mut ActorFrame) {
        self.timer = 0.0;
        body.motion.stop_horizontal();
        body.play("dead", false);
        self.duration = body.animator.duration_or("dead", DEAD_FALLBACK, DEAD_MIN);
    }

    fn on_update(&mut self, body: &mut PlayerBody, _frame: &mut ActorFrame, dt: f32) -> Transition {
        self.timer += dt;
        if self.timer >= self.duration {
            body.finish_death_sequence();
        }
        Transition::Stay
    }
}
