use crate::camera::Camera;
use crate::physics::{BodyKind, Chain};
use glam::{Vec2, Vec3};
use log::debug;

/// NDC depth the pointer is unprojected at before being pushed out along the
/// view ray.
pub const GRAB_DEPTH: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dragging {
    /// From the card's position to the world-space grab point.
    pub grab_offset: Vec3,
}

/// World point under the pointer.
///
/// Unprojects at [`GRAB_DEPTH`], then moves along the ray from the camera by
/// the camera's distance from the world origin. This is not a depth-correct
/// pick; it keeps the grab roughly at the scene's distance from the camera.
pub fn pointer_world_point(pointer: Vec2, camera: &Camera) -> Vec3 {
    let point = camera.unproject(pointer.extend(GRAB_DEPTH));
    let direction = (point - camera.position).normalize_or_zero();
    point + direction * camera.distance_from_origin()
}

/// Starts dragging the card from the point under the pointer.
pub fn begin_drag(chain: &mut Chain, pointer: Vec2, camera: &Camera) -> Vec3 {
    begin_drag_at(chain, pointer_world_point(pointer, camera))
}

/// Starts dragging the card from an explicit world point, e.g. a picking hit.
pub fn begin_drag_at(chain: &mut Chain, grab_point: Vec3) -> Vec3 {
    chain.wake_up();

    let card = chain.card_mut();
    card.kind = BodyKind::KinematicallyDriven;
    card.linear_velocity = Vec3::ZERO;

    let grab_offset = grab_point - card.position;
    debug!("drag started, grab offset {grab_offset:?}");
    grab_offset
}

pub fn update_drag(chain: &mut Chain, pointer: Vec2, camera: &Camera, grab_offset: Vec3) {
    let target = pointer_world_point(pointer, camera) - grab_offset;
    chain.wake_up();
    chain.card_mut().position = target;
}

/// Hands the card back to the solver. It resumes from rest: no velocity from
/// the drag motion is carried over.
pub fn end_drag(chain: &mut Chain) {
    let card = chain.card_mut();
    card.kind = BodyKind::Dynamic;
    card.linear_velocity = Vec3::ZERO;
    debug!("drag ended at {:?}", card.position);
}

/// Tracks the drag lifecycle across pointer events.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    state: Option<Dragging>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> Option<Dragging> {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        self.state.is_some()
    }

    pub fn begin(&mut self, chain: &mut Chain, pointer: Vec2, camera: &Camera) -> Dragging {
        self.begin_at(chain, pointer_world_point(pointer, camera))
    }

    pub fn begin_at(&mut self, chain: &mut Chain, grab_point: Vec3) -> Dragging {
        let dragging = Dragging {
            grab_offset: begin_drag_at(chain, grab_point),
        };
        self.state = Some(dragging);
        dragging
    }

    /// Returns `false` when no drag is in progress.
    pub fn update(&self, chain: &mut Chain, pointer: Vec2, camera: &Camera) -> bool {
        match self.state {
            Some(Dragging { grab_offset }) => {
                update_drag(chain, pointer, camera, grab_offset);
                true
            }
            None => false,
        }
    }

    pub fn end(&mut self, chain: &mut Chain) -> Option<Dragging> {
        let ended = self.state.take();
        if ended.is_some() {
            end_drag(chain);
        }
        ended
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::step;

    const DT: f32 = 1.0 / 60.0;
    const GRAVITY: Vec3 = Vec3::new(0.0, -40.0, 0.0);

    fn side_camera() -> Camera {
        Camera::looking_at(Vec3::new(5.0, 0.0, 15.0), Vec3::ZERO)
    }

    #[test]
    fn grab_point_sits_beyond_the_unprojected_point() {
        let camera = side_camera();
        let near = camera.unproject(Vec3::new(0.0, 0.0, GRAB_DEPTH));
        let point = pointer_world_point(Vec2::ZERO, &camera);

        let pushed = (point - near).length();
        assert!((pushed - camera.position.length()).abs() < 1e-3);
        // screen centre stays on the view axis
        let along = (point - camera.position).normalize();
        assert!(along.dot(camera.forward()) > 0.9999);
    }

    #[test]
    fn dragged_card_is_pinned_under_the_pointer() {
        let camera = side_camera();
        let mut chain = Chain::new(Vec3::new(0.0, 4.0, 0.0));
        let mut drag = DragController::new();

        let Dragging { grab_offset } = drag.begin(&mut chain, Vec2::ZERO, &camera);
        assert_eq!(chain.card().kind, BodyKind::KinematicallyDriven);

        assert!(drag.update(&mut chain, Vec2::ZERO, &camera));
        let world = pointer_world_point(Vec2::ZERO, &camera);
        assert_eq!(chain.card().position, world - grab_offset);
        assert!((chain.card().position + grab_offset - world).length() < 1e-5);

        let pinned = chain.card().position;
        step(&mut chain, DT, GRAVITY);
        drag.update(&mut chain, Vec2::ZERO, &camera);
        assert_eq!(chain.card().position, pinned);
    }

    #[test]
    fn release_hands_the_card_back_to_gravity() {
        let camera = side_camera();
        let mut chain = Chain::new(Vec3::new(0.0, 4.0, 0.0));
        let mut drag = DragController::new();

        drag.begin(&mut chain, Vec2::new(0.3, -0.2), &camera);
        drag.update(&mut chain, Vec2::new(0.3, -0.2), &camera);
        assert!(drag.end(&mut chain).is_some());
        assert!(drag.end(&mut chain).is_none());

        let card = chain.card();
        assert_eq!(card.kind, BodyKind::Dynamic);
        assert_eq!(card.linear_velocity, Vec3::ZERO);

        let before = chain.card().position.y;
        for _ in 0..30 {
            step(&mut chain, DT, GRAVITY);
        }
        assert!(chain.card().position.y < before - 1.0);
    }

    #[test]
    fn begin_wakes_a_sleeping_chain() {
        let mut chain = Chain::new(Vec3::ZERO);
        chain.fall_asleep();
        let grab = chain.card().position;
        begin_drag_at(&mut chain, grab);
        assert!(!chain.is_sleeping());
    }

    #[test]
    fn pointer_off_canvas_is_accepted() {
        let camera = side_camera();
        let point = pointer_world_point(Vec2::new(3.0, -2.5), &camera);
        assert!(point.is_finite());
    }
}
