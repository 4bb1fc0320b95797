//! Boss skill timings
//!
//! Every skill runs Windup, then Move when it has a move time, then Active
//! (one radius hit) and Recovery.

/// Timing and hit data of one boss skill
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkillConfig {
    pub name: &'static str,
    pub clip: &'static str,
    pub windup: f32,
    pub move_time: f32,
    pub active: f32,
    pub recovery: f32,
    /// How far short of the target a locked dash stops
    pub dash_distance: f32,
    pub radius: f32,
    pub damage: f32,
    /// Whether the dash destination is fixed when the skill starts
    pub lock_target: bool,
}

/// Skill used when no pending skill was set
pub const DEFAULT_SKILL: &str = "Combo3";

const SKILLS: [SkillConfig; 5] = [
    SkillConfig {
        name: "Combo3",
        clip: "combo3",
        windup: 0.35,
        move_time: 0.0,
        active: 0.5,
        recovery: 0.65,
        dash_distance: 0.0,
        radius: 120.0,
        damage: 12.0,
        lock_target: false,
    },
    SkillConfig {
        name: "DashSlash",
        clip: "rush",
        windup: 0.30,
        move_time: 0.25,
        active: 0.15,
        recovery: 0.50,
        dash_distance: 200.0,
        radius: 140.0,
        damage: 16.0,
        lock_target: true,
    },
    SkillConfig {
        name: "GroundSlam",
        clip: "groundslam",
        windup: 0.6,
        move_time: 0.0,
        active: 0.2,
        recovery: 0.8,
        dash_distance: 0.0,
        radius: 170.0,
        damage: 20.0,
        lock_target: false,
    },
    SkillConfig {
        name: "Roar",
        clip: "roar",
        windup: 1.0,
        move_time: 0.0,
        active: 0.0,
        recovery: 0.0,
        dash_distance: 0.0,
        radius: 0.0,
        damage: 0.0,
        lock_target: false,
    },
    SkillConfig {
        name: "LeapSlam",
        clip: "rush",
        windup: 0.35,
        move_time: 0.35,
        active: 0.15,
        recovery: 1.30,
        dash_distance: 200.0,
        radius: 300.0,
        damage: 26.0,
        lock_target: true,
    },
];

impl SkillConfig {
    /// Look up a skill by name; unknown names get the default skill
    pub fn lookup(name: &str) -> SkillConfig {
        match SKILLS.iter().find(|s| s.name == name) {
            Some(skill) => *skill,
            None => {
                log::debug!("No skill config for '{}', using {}", name, DEFAULT_SKILL);
                SKILLS[0]
            }
        }
    }

    pub fn all() -> &'static [SkillConfig] {
        &SKILLS
    }

    /// Clip that replaces the skill clip when Recovery starts
    pub fn recovery_clip(&self) -> Option<&'static str> {
        (self.name == "LeapSlam").then_some("groundslam")
    }
}
