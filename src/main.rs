//! Headless lanyard demo: settles the chain, drags the card sideways, lets go
//! and reports what the solver did.
//!
//! Usage: `lanyard-demo [config.json]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = native::run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use glam::Vec2;
    use lanyard_sim::{Result, Simulation, SimulationConfig};
    use log::info;

    const DT: f32 = 1.0 / 60.0;
    const SETTLE_FRAMES: usize = 300;
    const DRAG_FRAMES: usize = 60;

    pub fn run() -> Result<()> {
        let config = match std::env::args().nth(1) {
            Some(path) => SimulationConfig::load(path)?,
            None => SimulationConfig::default(),
        };
        let mut sim = Simulation::new(config)?;

        settle(&mut sim, "initial");

        let grab = sim.camera().project(sim.chain().card().position);
        let start = Vec2::new(grab.x, grab.y);
        sim.pointer_down(start);
        for i in 1..=DRAG_FRAMES {
            let t = i as f32 / DRAG_FRAMES as f32;
            sim.pointer_move(start + Vec2::new(0.4 * t, 0.2 * t));
            sim.frame(DT);
        }
        info!(
            "dragged card to {:?}, rope error {:.4}",
            sim.chain().card().position,
            sim.chain().max_rope_error()
        );

        sim.pointer_up();
        settle(&mut sim, "after release");
        Ok(())
    }

    fn settle(sim: &mut Simulation, label: &str) {
        let mut worst = 0.0_f32;
        for _ in 0..SETTLE_FRAMES {
            worst = worst.max(sim.frame(DT).step.max_rope_error);
        }

        let card = sim.card_transform();
        info!(
            "{label}: card at {:?}, worst rope error {worst:.4}, sleeping: {}",
            card.position,
            sim.chain().is_sleeping()
        );
        info!(
            "{label}: band runs {:?} -> {:?}",
            sim.band()[0],
            sim.band()[lanyard_sim::BAND_POINTS - 1]
        );
    }
}
