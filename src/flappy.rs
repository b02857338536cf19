//! # Flappy Module
//!
//! A side-scrolling course that a bird crosses at constant horizontal speed.
//! Every frame the bird falls; a `true` gene makes it jump during that frame.
//! The fitness of a gene sequence is the number of frames the bird survives,
//! which makes [`Game`] an [`Evaluator`] the engine can search against.
//!
//! ## Example
//!
//! ```rust
//! use flapgen::evolution::Evaluator;
//! use flapgen::flappy::{Game, Level};
//!
//! let game = Game::with_level(Level::new(0.5, 100.0));
//! let length = game.decision_count();
//!
//! // never jumping falls out of the course after a few frames
//! assert!(game.evaluate(&vec![false; length]) < length);
//! ```

use std::ops::AddAssign;

use crate::{
    chromosome::{Fitness, Gene},
    error::{GeneticError, Result},
    evolution::Evaluator,
};

pub const FPS: f32 = 60.0;
pub const HORIZONTAL_VELOCITY: f32 = 0.6 / FPS;
pub const VERTICAL_ACCELERATION: f32 = 9.8 / FPS;
pub const JUMP_ACCELERATION: f32 = VERTICAL_ACCELERATION * 2.0;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point2d {
    pub x: f32,
    pub y: f32,
}

impl Point2d {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl AddAssign for Point2d {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

/// An obstacle column with an opening in it.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pylon {
    /// Middle of the gap between the top and bottom parts.
    pub center: Point2d,
    pub width: f32,
    pub gap_height: f32,
}

impl Pylon {
    pub fn new(center: Point2d, width: f32, gap_height: f32) -> Self {
        Self {
            center,
            width,
            gap_height,
        }
    }

    /// `true` if the point is inside the column but outside the gap.
    ///
    /// Edges count as solid.
    pub fn hits(&self, point: Point2d) -> bool {
        let half_width = self.width / 2.0;
        let half_gap = self.gap_height / 2.0;

        let left = self.center.x - half_width;
        let right = self.center.x + half_width;
        let top = self.center.y - half_gap;
        let bottom = self.center.y + half_gap;

        (left..=right).contains(&point.x) && (point.y <= top || point.y >= bottom)
    }
}

/// The course: `[0, width] x [0, height]` with pylons placed inside it.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Level {
    pub width: f32,
    pub height: f32,
    pub pylons: Vec<Pylon>,
}

impl Level {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            pylons: Vec::new(),
        }
    }

    pub fn with_pylon(mut self, pylon: Pylon) -> Self {
        self.pylons.push(pylon);
        self
    }

    /// Alive while strictly between floor and ceiling and clear of every pylon.
    pub fn is_alive(&self, bird: Point2d) -> bool {
        if bird.y <= 0.0 || bird.y >= self.height {
            return false;
        }
        !self.pylons.iter().any(|pylon| pylon.hits(bird))
    }
}

/// Simulation parameters together with the course.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Game {
    pub fps: f32,
    pub horizontal_velocity: f32,
    pub vertical_acceleration: f32,
    pub jump_acceleration: f32,
    pub level: Level,
}

impl Game {
    pub fn new(
        fps: f32,
        horizontal_velocity: f32,
        vertical_acceleration: f32,
        jump_acceleration: f32,
        level: Level,
    ) -> Self {
        Self {
            fps,
            horizontal_velocity,
            vertical_acceleration,
            jump_acceleration,
            level,
        }
    }

    /// A game using the default physics constants.
    pub fn with_level(level: Level) -> Self {
        Self::new(
            FPS,
            HORIZONTAL_VELOCITY,
            VERTICAL_ACCELERATION,
            JUMP_ACCELERATION,
            level,
        )
    }

    pub fn validate(&self) -> Result<()> {
        if !self.horizontal_velocity.is_finite() || self.horizontal_velocity <= 0.0 {
            return Err(GeneticError::Configuration(
                "Horizontal velocity must be positive".to_string(),
            ));
        }
        if self.level.width <= 0.0 || self.level.height <= 0.0 {
            return Err(GeneticError::Configuration(
                "Level dimensions must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Number of frames needed to cross the course, which is the chromosome
    /// length to search with.
    pub fn decision_count(&self) -> usize {
        (self.level.width / self.horizontal_velocity).floor() as usize
    }

    /// Replays the decisions and returns the bird position after each
    /// surviving frame. Stops at the first fatal frame.
    pub fn trajectory(&self, genes: &[Gene]) -> Vec<Point2d> {
        let mut path = Vec::new();
        self.simulate(genes, |bird| path.push(bird));
        path
    }

    fn simulate(&self, genes: &[Gene], mut on_frame: impl FnMut(Point2d)) -> Fitness {
        let mut bird = Point2d::new(0.0, self.level.height / 2.0);
        let mut velocity = Point2d::new(self.horizontal_velocity, 0.0);

        for (frame, &jump) in genes.iter().enumerate() {
            // gravity applies even while jumping
            velocity.y += self.vertical_acceleration;
            if jump {
                velocity.y -= self.jump_acceleration;
            }
            bird += velocity;

            if !self.level.is_alive(bird) {
                return frame;
            }
            on_frame(bird);
        }
        genes.len()
    }
}

impl Evaluator for Game {
    fn evaluate(&self, genes: &[Gene]) -> Fitness {
        self.simulate(genes, |_| {})
    }
}
