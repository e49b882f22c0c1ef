use std::f64::consts::TAU;

use rand::Rng;

use super::logos::Logo;
use super::types::{Decoration, Glyph, Link, Node, NodeKind, Orbit, Scene, Viewport};

pub const SATELLITE_COUNT: usize = 7;
pub const FLOATER_COUNT: usize = 18;
pub const FLOATER_LINK_PROBABILITY: f64 = 0.4;

const BINARY_COUNT: usize = 8;
const LABEL_COUNT: usize = 5;
const LOGO_COUNT: usize = 12;
const NEURAL_COUNT: usize = 4;

const HUB_RADIUS: f64 = 14.0;
const SATELLITE_RADIUS: f64 = 9.0;
const ORBIT_FRACTION: f64 = 0.28;
const MAX_DRIFT: f64 = 0.5;

const HUB_COLOR: &str = "#4fc3f7";
const SATELLITE_COLOR: &str = "#29b6f6";
const FLOATER_COLORS: &[&str] = &["#81d4fa", "#4dd0e1", "#80cbc4", "#9fa8da"];

const LABELS: &[&str] = &[
	"PRIMARY", "REPLICA", "WAL", "VACUUM", "FAILOVER", "SHARD", "LAG", "QPS",
];

/// Uniform draw that collapses to `lo` when the range is empty.
fn span(rng: &mut impl Rng, lo: f64, hi: f64) -> f64 {
	if hi > lo { rng.random_range(lo..=hi) } else { lo }
}

fn drift(rng: &mut impl Rng) -> (f64, f64) {
	let angle = rng.random_range(0.0..TAU);
	let speed = rng.random_range(0.1..=MAX_DRIFT);
	(speed * angle.cos(), speed * angle.sin())
}

impl Scene {
	/// Builds a fresh, randomized scene for `viewport`.
	pub fn new(viewport: Viewport, rng: &mut impl Rng) -> Self {
		let nodes = build_nodes(viewport, rng);
		let links = build_links(&nodes, rng);
		let decorations = build_decorations(viewport, rng);
		Self {
			viewport,
			nodes,
			links,
			decorations,
		}
	}
}

fn build_nodes(viewport: Viewport, rng: &mut impl Rng) -> Vec<Node> {
	let (cx, cy) = viewport.center();
	let orbit_radius = viewport.width.min(viewport.height) * ORBIT_FRACTION;
	let mut nodes = Vec::with_capacity(1 + SATELLITE_COUNT + FLOATER_COUNT);

	nodes.push(Node {
		x: cx,
		y: cy,
		vx: 0.0,
		vy: 0.0,
		radius: HUB_RADIUS,
		color: HUB_COLOR,
		phase: 0.0,
		kind: NodeKind::Hub,
	});

	for i in 0..SATELLITE_COUNT {
		let angle = i as f64 * TAU / SATELLITE_COUNT as f64;
		nodes.push(Node {
			x: cx + orbit_radius * angle.cos(),
			y: cy + orbit_radius * angle.sin(),
			vx: 0.0,
			vy: 0.0,
			radius: SATELLITE_RADIUS,
			color: SATELLITE_COLOR,
			phase: rng.random_range(0.0..TAU),
			kind: NodeKind::Satellite(Orbit {
				angle,
				radius: orbit_radius,
				speed: rng.random_range(0.5..1.5),
			}),
		});
	}

	for _ in 0..FLOATER_COUNT {
		let radius = rng.random_range(4.0..7.0);
		let (vx, vy) = drift(rng);
		nodes.push(Node {
			x: span(rng, radius, viewport.width - radius),
			y: span(rng, radius, viewport.height - radius),
			vx,
			vy,
			radius,
			color: FLOATER_COLORS[rng.random_range(0..FLOATER_COLORS.len())],
			phase: rng.random_range(0.0..TAU),
			kind: NodeKind::Floater,
		});
	}

	nodes
}

fn build_links(nodes: &[Node], rng: &mut impl Rng) -> Vec<Link> {
	let satellites: Vec<usize> = (0..nodes.len()).filter(|&i| nodes[i].is_satellite()).collect();
	let mut links: Vec<Link> = satellites.iter().map(|&s| Link::new(0, s)).collect();

	for (i, node) in nodes.iter().enumerate().filter(|(_, n)| n.is_floater()) {
		let linked = rng.random_bool(FLOATER_LINK_PROBABILITY);
		let nearest = satellites.iter().copied().min_by(|&a, &b| {
			node.distance_to(&nodes[a])
				.total_cmp(&node.distance_to(&nodes[b]))
		});
		if let (true, Some(sat)) = (linked, nearest) {
			links.push(Link::new(i, sat));
		}
	}

	links
}

fn binary_string(rng: &mut impl Rng) -> String {
	(0..8)
		.map(|_| if rng.random_bool(0.5) { '1' } else { '0' })
		.collect()
}

fn build_decorations(viewport: Viewport, rng: &mut impl Rng) -> Vec<Decoration> {
	let mut glyphs: Vec<(Glyph, f64, f64, f64)> = Vec::new();

	for _ in 0..BINARY_COUNT {
		let size = rng.random_range(11.0..15.0);
		glyphs.push((Glyph::Binary(binary_string(rng)), size, rng.random_range(0.1..0.4), 0.0));
	}
	for _ in 0..LABEL_COUNT {
		let label = LABELS[rng.random_range(0..LABELS.len())];
		let size = rng.random_range(13.0..18.0);
		glyphs.push((Glyph::Label(label), size, rng.random_range(0.15..0.5), 0.0));
	}
	for i in 0..LOGO_COUNT {
		let logo = Logo::ALL[i % Logo::ALL.len()];
		let base = if logo.is_oversized() { 44.0 } else { 28.0 };
		let spin = rng.random_range(-0.0003..0.0003);
		glyphs.push((Glyph::Logo(logo), base + rng.random_range(0.0..8.0), rng.random_range(0.12..0.3), spin));
	}
	for _ in 0..NEURAL_COUNT {
		let spin = rng.random_range(-0.0005..0.0005);
		glyphs.push((Glyph::Neural, rng.random_range(18.0..30.0), rng.random_range(0.15..0.35), spin));
	}

	glyphs
		.into_iter()
		.map(|(glyph, size, opacity, rotation_speed)| {
			let (vx, vy) = drift(rng);
			Decoration {
				x: span(rng, 0.0, viewport.width),
				y: span(rng, 0.0, viewport.height),
				vx,
				vy,
				glyph,
				opacity,
				size,
				rotation: rng.random_range(0.0..TAU),
				rotation_speed,
			}
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	use super::*;

	fn scene(width: f64, height: f64, seed: u64) -> Scene {
		Scene::new(Viewport::new(width, height), &mut StdRng::seed_from_u64(seed))
	}

	#[test]
	fn node_counts_hold_for_any_viewport() {
		for (i, &(w, h)) in [(1280.0, 720.0), (320.0, 640.0), (0.0, 0.0), (5.0, 3000.0)]
			.iter()
			.enumerate()
		{
			let s = scene(w, h, i as u64);
			assert_eq!(s.nodes.iter().filter(|n| n.is_hub()).count(), 1);
			assert_eq!(s.nodes.iter().filter(|n| n.is_satellite()).count(), SATELLITE_COUNT);
			assert_eq!(s.nodes.iter().filter(|n| n.is_floater()).count(), FLOATER_COUNT);
			assert!(s.hub().is_some());
		}
	}

	#[test]
	fn hub_sits_at_center() {
		let s = scene(800.0, 600.0, 1);
		let hub = s.hub().unwrap();
		assert_eq!((hub.x, hub.y), (400.0, 300.0));
	}

	#[test]
	fn hub_links_every_satellite_once() {
		for seed in 0..20 {
			let s = scene(1024.0, 768.0, seed);
			let hub_links: Vec<&Link> = s.links.iter().filter(|l| l.from == 0).collect();
			assert_eq!(hub_links.len(), SATELLITE_COUNT);
			for (i, _) in s.nodes.iter().enumerate().filter(|(_, n)| n.is_satellite()) {
				assert_eq!(hub_links.iter().filter(|l| l.to == i).count(), 1);
			}
			let floater_links = s.links.len() - SATELLITE_COUNT;
			assert!(floater_links <= FLOATER_COUNT);
		}
	}

	#[test]
	fn floater_links_target_nearest_satellite() {
		for seed in 0..20 {
			let s = scene(1024.0, 768.0, seed);
			for link in s.links.iter().filter(|l| l.from != 0) {
				let floater = &s.nodes[link.from];
				assert!(floater.is_floater());
				let chosen = floater.distance_to(&s.nodes[link.to]);
				let best = s
					.nodes
					.iter()
					.filter(|n| n.is_satellite())
					.map(|n| floater.distance_to(n))
					.fold(f64::INFINITY, f64::min);
				assert!(s.nodes[link.to].is_satellite());
				assert!((chosen - best).abs() < 1e-9);
			}
		}
	}

	#[test]
	fn floater_linking_is_roughly_forty_percent() {
		let total: usize = (0..200)
			.map(|seed| scene(1024.0, 768.0, seed).links.len() - SATELLITE_COUNT)
			.sum();
		let ratio = total as f64 / (200 * FLOATER_COUNT) as f64;
		assert!((0.3..0.5).contains(&ratio), "ratio {ratio}");
	}

	#[test]
	fn satellites_start_on_their_orbit() {
		let s = scene(900.0, 500.0, 3);
		let hub = s.hub().unwrap().clone();
		for node in &s.nodes {
			if let NodeKind::Satellite(orbit) = node.kind {
				assert!((node.distance_to(&hub) - orbit.radius).abs() < 1e-9);
				assert!((orbit.radius - 500.0 * ORBIT_FRACTION).abs() < 1e-9);
			}
		}
	}

	#[test]
	fn floaters_start_inside_bounds() {
		let s = scene(640.0, 480.0, 9);
		for n in s.nodes.iter().filter(|n| n.is_floater()) {
			assert!(n.x >= n.radius && n.x <= 640.0 - n.radius);
			assert!(n.y >= n.radius && n.y <= 480.0 - n.radius);
			assert!(n.vx.hypot(n.vy) <= MAX_DRIFT + 1e-9);
		}
	}

	#[test]
	fn decoration_mix() {
		let s = scene(1280.0, 720.0, 5);
		let count = |f: fn(&Glyph) -> bool| s.decorations.iter().filter(|d| f(&d.glyph)).count();
		assert_eq!(count(|g| matches!(g, Glyph::Binary(_))), BINARY_COUNT);
		assert_eq!(count(|g| matches!(g, Glyph::Label(_))), LABEL_COUNT);
		assert_eq!(count(|g| matches!(g, Glyph::Logo(_))), LOGO_COUNT);
		assert_eq!(count(|g| matches!(g, Glyph::Neural)), NEURAL_COUNT);

		let (lo, hi) = super::super::types::OPACITY_BAND;
		for d in s.decorations.iter().filter(|d| d.glyph.shimmers()) {
			assert!(d.opacity >= lo && d.opacity <= hi);
		}
		for d in &s.decorations {
			if let Glyph::Logo(logo) = d.glyph {
				assert_eq!(logo.is_oversized(), d.size >= 44.0);
			}
		}
	}
}
