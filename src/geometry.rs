// Copyright 2025 the Bikestem Authors
// SPDX-License-Identifier: Apache-2.0

//! Stem geometry.
//!
//! Converts the component parameters of a `FitState` into the position of
//! the head-tube top and the stem end in drawing space (y grows downward),
//! and into the rise and run each component adds to the frame's stack and
//! reach. Angles come in as degrees from horizontal.

use crate::model::FitState;
use crate::settings::drawing;
use kurbo::{Line, Point, Vec2};

/// Geometry derived from a fit state. Never stored; recompute on change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    /// Drawing origin (bottom of the spacer stack)
    pub origin: Point,
    /// Head-tube angle measured from the other side, `180 - angleHt`
    pub flipped_headtube_angle: f64,
    /// Stem angle mirrored for drawing, `180 - angleStem`
    pub stem_angle: f64,
    /// Top of the spacer stack, where the stem clamps on
    pub top_of_ht: Point,
    /// Handlebar clamp end of the stem
    pub stem_end: Point,
    pub spacer_rise: f64,
    pub spacer_run: f64,
    pub stem_rise: f64,
    pub stem_run: f64,
    pub total_rise: f64,
    pub total_run: f64,
}

/// Spacer and stem as drawable segments, scaled down for the diagram
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Diagram {
    pub spacer: Line,
    pub stem: Line,
}

impl Geometry {
    /// Compute the geometry of a fit state. Total: any real input works.
    pub fn from_state(state: &FitState) -> Self {
        let origin = Point::new(state.stem_x_origin, state.stem_y_origin);
        let flipped_headtube_angle = 180.0 - state.angle_ht;
        let stem_angle = 180.0 - state.angle_stem;

        let (ht_sin, ht_cos) = flipped_headtube_angle.to_radians().sin_cos();
        let top_of_ht = origin + Vec2::new(ht_cos * state.spacer, -ht_sin * state.spacer);

        let (stem_sin, stem_cos) = stem_angle.to_radians().sin_cos();
        let stem_end = top_of_ht - Vec2::new(stem_cos * state.stem, stem_sin * state.stem);

        let spacer_rise = state.spacer * state.angle_ht.to_radians().sin();
        let spacer_run = state.spacer * (90.0 - state.angle_ht).to_radians().sin();
        let stem_rise = state.stem * state.angle_stem.to_radians().sin();
        let stem_run = state.stem * (90.0 - state.angle_stem).to_radians().sin();

        Self {
            origin,
            flipped_headtube_angle,
            stem_angle,
            top_of_ht,
            stem_end,
            spacer_rise,
            spacer_run,
            stem_rise,
            stem_run,
            total_rise: spacer_rise + stem_rise,
            total_run: stem_run - spacer_run,
        }
    }

    /// Segments for the diagram, divided by the drawing shrink factor
    pub fn diagram(&self) -> Diagram {
        let scale = |p: Point| Point::new(p.x / drawing::SHRINK_FACTOR, p.y / drawing::SHRINK_FACTOR);
        Diagram {
            spacer: Line::new(scale(self.origin), scale(self.top_of_ht)),
            stem: Line::new(scale(self.top_of_ht), scale(self.stem_end)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn vertical_headtube_adds_only_rise() {
        let state = FitState {
            angle_ht: 90.0,
            angle_stem: 0.0,
            spacer: 40.0,
            stem: 100.0,
            ..FitState::default()
        };
        let geometry = Geometry::from_state(&state);
        assert!(approx(geometry.spacer_rise, 40.0));
        assert!(approx(geometry.spacer_run, 0.0));
        assert!(approx(geometry.stem_rise, 0.0));
        assert!(approx(geometry.stem_run, 100.0));
        assert!(approx(geometry.total_rise, 40.0));
        assert!(approx(geometry.total_run, 100.0));
    }

    #[test]
    fn default_state_rise_and_run() {
        let geometry = Geometry::from_state(&FitState::default());
        // 40mm of spacers at 73 degrees, level 100mm stem
        assert!(approx(geometry.spacer_rise, 40.0 * 73f64.to_radians().sin()));
        assert!(approx(geometry.spacer_run, 40.0 * 17f64.to_radians().sin()));
        assert!(approx(geometry.total_run, 100.0 - geometry.spacer_run));
        assert_eq!(geometry.flipped_headtube_angle, 107.0);
        assert_eq!(geometry.stem_angle, 180.0);
    }

    #[test]
    fn drawing_points_move_up_and_forward() {
        let state = FitState::default();
        let geometry = Geometry::from_state(&state);
        // y grows downward, so the spacer stack moves up (smaller y)
        assert!(geometry.top_of_ht.y < state.stem_y_origin);
        // Slack head tube leans back toward smaller x
        assert!(geometry.top_of_ht.x < state.stem_x_origin);
        // A level stem reaches forward by its full length
        assert!(approx(geometry.stem_end.x - geometry.top_of_ht.x, 100.0));
        assert!(approx(geometry.stem_end.y, geometry.top_of_ht.y));
    }

    #[test]
    fn negative_stem_angle_drops() {
        let state = FitState {
            angle_stem: -30.0,
            ..FitState::default()
        };
        let geometry = Geometry::from_state(&state);
        assert!(approx(geometry.stem_rise, -50.0));
        assert!(geometry.stem_end.y > geometry.top_of_ht.y);
    }

    #[test]
    fn diagram_is_scaled() {
        let geometry = Geometry::from_state(&FitState::default());
        let diagram = geometry.diagram();
        assert!(approx(diagram.spacer.p0.x, 100.0 / 2.3));
        assert!(approx(diagram.spacer.p0.y, 200.0 / 2.3));
        assert_eq!(diagram.spacer.p1, diagram.stem.p0);
        assert!(approx(diagram.stem.p1.x, geometry.stem_end.x / 2.3));
    }
}
