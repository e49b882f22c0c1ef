use rand::Rng;

use super::types::{Decoration, Link, Node, NodeKind, OPACITY_BAND, Particle, Scene, Viewport};

const HUB_PULSE: f64 = 0.002;
const ORBIT_RATE: f64 = 0.0005;
const SATELLITE_PULSE: f64 = 0.003;
const FLOATER_RATE: f64 = 0.05;
const FLOATER_PULSE: f64 = 0.002;
const WANDER_PROBABILITY: f64 = 0.01;
const WANDER_KICK: f64 = 0.1;
const MAX_FLOATER_SPEED: f64 = 1.0;

const PARTICLE_RATE: f64 = 0.001;
const SPAWN_PROBABILITY: f64 = 0.02;

const DECORATION_RATE: f64 = 0.03;
const SHIMMER_CLOCK: f64 = 0.001;
const SHIMMER_SPATIAL: f64 = 0.01;
const SHIMMER_AMPLITUDE: f64 = 0.01;

/// Mirrors `pos` back into `[lo, hi]`, flipping `vel` to point inward.
fn reflect(pos: &mut f64, vel: &mut f64, lo: f64, hi: f64) {
	let hi = hi.max(lo);
	if *pos < lo {
		*pos = lo;
		*vel = vel.abs();
	} else if *pos > hi {
		*pos = hi;
		*vel = -vel.abs();
	}
}

impl Scene {
	/// Advances every entity by `dt_ms`. `clock_ms` is the wall clock driving the text shimmer.
	pub fn update(&mut self, dt_ms: f64, clock_ms: f64, rng: &mut impl Rng) {
		let dt = if dt_ms.is_finite() { dt_ms.max(0.0) } else { 0.0 };
		let Scene {
			viewport,
			nodes,
			links,
			decorations,
		} = self;

		let center = viewport.center();
		for node in nodes.iter_mut() {
			step_node(node, center, *viewport, dt, rng);
		}
		for link in links.iter_mut() {
			step_link(link, nodes, dt, rng);
		}
		for decoration in decorations.iter_mut() {
			step_decoration(decoration, *viewport, dt, clock_ms);
		}
	}
}

fn step_node(node: &mut Node, center: (f64, f64), bounds: Viewport, dt: f64, rng: &mut impl Rng) {
	match &mut node.kind {
		NodeKind::Hub => {
			(node.x, node.y) = center;
			node.phase += dt * HUB_PULSE;
		}
		NodeKind::Satellite(orbit) => {
			orbit.angle += dt * ORBIT_RATE * orbit.speed;
			node.x = center.0 + orbit.radius * orbit.angle.cos();
			node.y = center.1 + orbit.radius * orbit.angle.sin();
			node.phase += dt * SATELLITE_PULSE;
		}
		NodeKind::Floater => {
			node.x += node.vx * dt * FLOATER_RATE;
			node.y += node.vy * dt * FLOATER_RATE;
			reflect(&mut node.x, &mut node.vx, node.radius, bounds.width - node.radius);
			reflect(&mut node.y, &mut node.vy, node.radius, bounds.height - node.radius);

			if rng.random_bool(WANDER_PROBABILITY) {
				node.vx += rng.random_range(-WANDER_KICK..=WANDER_KICK);
				node.vy += rng.random_range(-WANDER_KICK..=WANDER_KICK);
				let speed = node.vx.hypot(node.vy);
				if speed > MAX_FLOATER_SPEED {
					node.vx *= MAX_FLOATER_SPEED / speed;
					node.vy *= MAX_FLOATER_SPEED / speed;
				}
			}
			node.phase += dt * FLOATER_PULSE;
		}
	}
}

fn step_link(link: &mut Link, nodes: &[Node], dt: f64, rng: &mut impl Rng) {
	let (Some(from), Some(to)) = (nodes.get(link.from), nodes.get(link.to)) else {
		link.particles.clear();
		return;
	};

	for p in link.particles.iter_mut() {
		p.progress += p.speed * dt * PARTICLE_RATE;
		p.x = from.x + (to.x - from.x) * p.progress;
		p.y = from.y + (to.y - from.y) * p.progress;
	}
	link.particles.retain(|p| p.progress < 1.0);

	if rng.random_bool(SPAWN_PROBABILITY) {
		link.particles.push(Particle {
			progress: 0.0,
			speed: rng.random_range(0.5..1.5),
			size: rng.random_range(1.5..3.0),
			x: from.x,
			y: from.y,
		});
	}
}

fn step_decoration(d: &mut Decoration, bounds: Viewport, dt: f64, clock_ms: f64) {
	d.x += d.vx * dt * DECORATION_RATE;
	d.y += d.vy * dt * DECORATION_RATE;
	d.rotation += d.rotation_speed * dt;
	reflect(&mut d.x, &mut d.vx, 0.0, bounds.width);
	reflect(&mut d.y, &mut d.vy, 0.0, bounds.height);

	if d.glyph.shimmers() {
		let wave = (clock_ms * SHIMMER_CLOCK + d.x * SHIMMER_SPATIAL).sin();
		d.opacity = (d.opacity + wave * SHIMMER_AMPLITUDE).clamp(OPACITY_BAND.0, OPACITY_BAND.1);
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	use super::*;
	use crate::components::network_backdrop::types::Glyph;

	fn setup(seed: u64) -> (Scene, StdRng) {
		let mut rng = StdRng::seed_from_u64(seed);
		let scene = Scene::new(Viewport::new(800.0, 600.0), &mut rng);
		(scene, rng)
	}

	#[test]
	fn floaters_stay_in_bounds_for_any_dt() {
		let (mut scene, mut rng) = setup(11);
		for (frame, dt) in [0.0, 16.0, 33.0, 250.0, 5000.0, 1e6].iter().cycle().take(600).enumerate() {
			scene.update(*dt, frame as f64 * 16.0, &mut rng);
			for n in scene.nodes.iter().filter(|n| n.is_floater()) {
				assert!(n.x >= n.radius && n.x <= 800.0 - n.radius, "x = {}", n.x);
				assert!(n.y >= n.radius && n.y <= 600.0 - n.radius, "y = {}", n.y);
				assert!(n.vx.hypot(n.vy) <= MAX_FLOATER_SPEED + 1e-9);
			}
		}
	}

	#[test]
	fn satellites_keep_orbit_distance() {
		let (mut scene, mut rng) = setup(12);
		for frame in 0..500 {
			scene.update(16.7, frame as f64 * 16.7, &mut rng);
			let hub = scene.hub().unwrap().clone();
			assert_eq!((hub.x, hub.y), (400.0, 300.0));
			for n in &scene.nodes {
				if let NodeKind::Satellite(orbit) = n.kind {
					assert!((n.distance_to(&hub) - orbit.radius).abs() < 1e-6);
				}
			}
		}
	}

	#[test]
	fn phases_advance() {
		let (mut scene, mut rng) = setup(13);
		let before: Vec<f64> = scene.nodes.iter().map(|n| n.phase).collect();
		scene.update(16.0, 0.0, &mut rng);
		for (n, b) in scene.nodes.iter().zip(before) {
			assert!(n.phase > b);
		}
	}

	#[test]
	fn particles_advance_monotonically_until_removed() {
		let (mut scene, mut rng) = setup(14);
		// Spawned particles are never this large, so the marker is unique.
		let marker = |l: &Link| l.particles.iter().find(|p| p.size == 99.0).map(|p| p.progress);
		scene.links[3].particles.push(Particle { progress: 0.0, speed: 0.7, size: 99.0, x: 0.0, y: 0.0 });

		let mut last = 0.0;
		let mut frames = 0;
		while let Some(progress) = marker(&scene.links[3]) {
			assert!(progress >= last);
			assert!(progress < 1.0);
			last = progress;
			scene.update(16.0, frames as f64 * 16.0, &mut rng);
			frames += 1;
			assert!(frames < 1000);
		}
		assert!(last + 0.7 * 16.0 * PARTICLE_RATE >= 1.0);
		assert!(scene.links.iter().flat_map(|l| &l.particles).all(|p| p.progress < 1.0));
	}

	#[test]
	fn finished_particles_are_dropped() {
		let (mut scene, mut rng) = setup(15);
		let link = &mut scene.links[0];
		link.particles.push(Particle { progress: 0.999, speed: 1.0, size: 2.0, x: 0.0, y: 0.0 });
		link.particles.push(Particle { progress: 0.1, speed: 1.0, size: 2.0, x: 0.0, y: 0.0 });
		scene.update(16.0, 0.0, &mut rng);
		let link = &scene.links[0];
		assert!(link.particles.iter().all(|p| p.progress < 1.0));
		assert!(link.particles.iter().any(|p| (p.progress - 0.116).abs() < 1e-9));
		assert!(!link.particles.iter().any(|p| p.progress > 0.5));
	}

	#[test]
	fn particles_sit_on_their_link() {
		let (mut scene, mut rng) = setup(16);
		scene.links[0].particles.push(Particle { progress: 0.5, speed: 1.0, size: 2.0, x: 0.0, y: 0.0 });
		scene.update(10.0, 0.0, &mut rng);
		let link = &scene.links[0];
		let (a, b) = (&scene.nodes[link.from], &scene.nodes[link.to]);
		let p = link.particles.iter().find(|p| p.progress > 0.5).unwrap();
		assert!((p.x - (a.x + (b.x - a.x) * p.progress)).abs() < 1e-9);
		assert!((p.y - (a.y + (b.y - a.y) * p.progress)).abs() < 1e-9);
	}

	#[test]
	fn shimmer_opacity_stays_in_band() {
		let (mut scene, mut rng) = setup(17);
		for d in scene.decorations.iter_mut().filter(|d| d.glyph.shimmers()).step_by(2) {
			d.opacity = OPACITY_BAND.1;
		}
		for frame in 0..5000 {
			scene.update(16.0, frame as f64 * 97.0, &mut rng);
			for d in scene.decorations.iter().filter(|d| d.glyph.shimmers()) {
				assert!(d.opacity >= OPACITY_BAND.0 && d.opacity <= OPACITY_BAND.1);
			}
		}
	}

	#[test]
	fn decorations_reflect_and_spin() {
		let (mut scene, mut rng) = setup(18);
		let logo = scene
			.decorations
			.iter()
			.position(|d| matches!(d.glyph, Glyph::Logo(_)))
			.unwrap();
		scene.decorations[logo].rotation_speed = 0.001;
		let start = scene.decorations[logo].rotation;
		for frame in 0..1000 {
			scene.update(50.0, frame as f64 * 50.0, &mut rng);
			for d in &scene.decorations {
				assert!((0.0..=800.0).contains(&d.x) && (0.0..=600.0).contains(&d.y));
			}
		}
		assert!((scene.decorations[logo].rotation - start - 50.0).abs() < 1e-6);
	}

	#[test]
	fn negative_dt_is_ignored() {
		let (mut scene, mut rng) = setup(19);
		let hub_phase = scene.nodes[0].phase;
		scene.update(-100.0, 0.0, &mut rng);
		scene.update(f64::NAN, 0.0, &mut rng);
		assert_eq!(scene.nodes[0].phase, hub_phase);
	}

	#[test]
	fn reflect_flips_inward() {
		let (mut pos, mut vel) = (-3.0, -1.0);
		reflect(&mut pos, &mut vel, 0.0, 10.0);
		assert_eq!((pos, vel), (0.0, 1.0));
		let (mut pos, mut vel) = (12.0, 2.0);
		reflect(&mut pos, &mut vel, 0.0, 10.0);
		assert_eq!((pos, vel), (10.0, -2.0));
	}
}
