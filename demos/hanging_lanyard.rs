//! Prints the lanyard's band and card pose as it swings down from its
//! horizontal start, then while it is dragged in a circle.
//!
//! Run with `RUST_LOG=debug cargo run --example hanging_lanyard` to see the
//! solver's drag and sleep messages.

use glam::Vec2;
use lanyard_sim::{RopeMode, Simulation, SimulationConfig, TimestepMode};

const DT: f32 = 1.0 / 60.0;

fn main() -> lanyard_sim::Result<()> {
    env_logger::init();

    let config = SimulationConfig::new()
        .with_rope_mode(RopeMode::Slack)
        .with_timestep(TimestepMode::Fixed {
            step: 1.0 / 120.0,
            max_substeps: 4,
        });
    let mut sim = Simulation::new(config)?;

    println!("-- falling --");
    for frame in 0..120 {
        let out = sim.frame(DT);
        if frame % 20 == 0 {
            let card = out.transforms[4];
            println!(
                "frame {frame:3}: card ({:6.2}, {:6.2}, {:6.2})  band mid {:?}",
                card.position.x,
                card.position.y,
                card.position.z,
                out.band[out.band.len() / 2]
            );
        }
    }

    println!("-- dragging --");
    let card = sim.chain().card().position;
    let ndc = sim.camera().project(card);
    let center = Vec2::new(ndc.x, ndc.y);
    sim.pointer_down(center);
    for frame in 0..120 {
        let angle = frame as f32 / 120.0 * std::f32::consts::TAU;
        sim.pointer_move(center + 0.15 * Vec2::new(angle.cos() - 1.0, angle.sin()));
        let out = sim.frame(DT);
        if frame % 20 == 0 {
            println!(
                "frame {frame:3}: rope error {:.4}, pivot error {:.6}",
                out.step.max_rope_error, out.step.pivot_error
            );
        }
    }
    sim.pointer_up();

    for _ in 0..600 {
        sim.frame(DT);
    }
    println!(
        "-- released -- card at {:?}, asleep: {}",
        sim.chain().card().position,
        sim.chain().is_sleeping()
    );
    Ok(())
}
