//! WASM entry point - exposes the lanyard simulation to JavaScript.
//!
//! The page owns rendering; each frame it feeds pointer input in and reads the
//! band polyline and body poses back as flat `f32` arrays.

use crate::config::SimulationConfig;
use crate::simulation::Simulation;
use glam::{Vec2, Vec3};
use wasm_bindgen::prelude::*;

/// Longest frame time fed to the solver, in seconds.
const MAX_FRAME_TIME: f32 = 0.1;

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Warn).is_err() {
        web_sys::console::warn_1(&"logger already initialized".into());
    }
}

#[wasm_bindgen]
pub struct WebLanyard {
    sim: Simulation,
    last_time: f64,
}

#[wasm_bindgen]
impl WebLanyard {
    /// Builds a simulation from an optional JSON config.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<WebLanyard, JsError> {
        let config = match config_json {
            Some(json) => SimulationConfig::from_json_str(&json)?,
            None => SimulationConfig::default(),
        };
        Ok(Self {
            sim: Simulation::new(config)?,
            last_time: 0.0,
        })
    }

    pub fn set_camera(&mut self, x: f32, y: f32, z: f32, fov_degrees: f32, aspect: f32) {
        let camera = self.sim.camera_mut();
        camera.position = Vec3::new(x, y, z);
        camera.fov = fov_degrees.to_radians();
        camera.set_aspect(aspect);
    }

    pub fn pointer_down(&mut self, ndc_x: f32, ndc_y: f32) {
        self.sim.pointer_down(Vec2::new(ndc_x, ndc_y));
    }

    /// Press on a point the page's own picking found on the card.
    pub fn pointer_down_at(&mut self, ndc_x: f32, ndc_y: f32, hit_x: f32, hit_y: f32, hit_z: f32) {
        self.sim
            .pointer_down_at(Vec2::new(ndc_x, ndc_y), Vec3::new(hit_x, hit_y, hit_z));
    }

    pub fn pointer_move(&mut self, ndc_x: f32, ndc_y: f32) {
        self.sim.pointer_move(Vec2::new(ndc_x, ndc_y));
    }

    pub fn pointer_up(&mut self) {
        self.sim.pointer_up();
    }

    /// Advances by `dt` seconds and returns the band as packed xyz floats.
    pub fn frame(&mut self, dt: f32) -> Vec<f32> {
        self.sim.frame(dt.min(MAX_FRAME_TIME));
        self.sim.band_floats().to_vec()
    }

    /// Advances by the time since the previous tick, read from `performance.now()`.
    pub fn tick(&mut self) -> Vec<f32> {
        let now = web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or(0.0);

        let dt = if self.last_time > 0.0 {
            ((now - self.last_time) / 1000.0) as f32
        } else {
            1.0 / 60.0
        };
        self.last_time = now;

        self.frame(dt)
    }

    /// Body poses, anchor first, as `[px, py, pz, qx, qy, qz, qw]` per body.
    pub fn transforms(&self) -> Vec<f32> {
        bytemuck::cast_slice(&self.sim.instance_data()).to_vec()
    }

    pub fn is_dragging(&self) -> bool {
        self.sim.is_dragging()
    }
}
