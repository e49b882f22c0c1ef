use std::f64::consts::TAU;

use super::logos::{Logo, LogoAtlas};
use super::surface::Surface;
use super::types::{Decoration, Glyph, Link, Node, NodeKind, Scene};

pub const BACKGROUND: &str = "#0b1120";
const PARTICLE_COLOR: &str = "rgba(125, 211, 252, 0.85)";
const BINARY_COLOR: &str = "#38bdf8";
const LABEL_COLOR: &str = "#94a3b8";
const LOGO_OUTLINE: &str = "#e2e8f0";
const NEURAL_COLOR: &str = "#a5b4fc";

/// Draws `scene` onto `surface`. Never mutates the scene.
pub fn render<S: Surface>(surface: &S, scene: &Scene, logos: &LogoAtlas<S::Image>) {
	let viewport = scene.viewport;
	surface.clear(viewport.width, viewport.height, BACKGROUND);
	draw_particles(surface, &scene.links);
	draw_nodes(surface, &scene.nodes);
	draw_decorations(surface, &scene.decorations, logos);
}

fn ease_breath(node: &Node) -> f64 {
	let amplitude = match node.kind {
		NodeKind::Hub => 0.3,
		NodeKind::Satellite(_) => 0.2,
		NodeKind::Floater => 0.1,
	};
	1.0 + amplitude * node.phase.sin()
}

fn glow(node: &Node) -> f64 {
	match node.kind {
		NodeKind::Hub => 24.0,
		NodeKind::Satellite(_) => 12.0,
		NodeKind::Floater => 0.0,
	}
}

/// Resets the paint state an entity may have touched.
fn reset_paint<S: Surface>(surface: &S) {
	surface.set_shadow(0.0, "transparent");
	surface.set_global_alpha(1.0);
	surface.restore();
}

fn draw_particles<S: Surface>(surface: &S, links: &[Link]) {
	for p in links.iter().flat_map(|l| &l.particles) {
		surface.save();
		surface.set_fill(PARTICLE_COLOR);
		surface.fill_ellipse(p.x, p.y, p.size, p.size);
		reset_paint(surface);
	}
}

fn draw_nodes<S: Surface>(surface: &S, nodes: &[Node]) {
	for node in nodes {
		let r = node.radius * ease_breath(node);
		let (w, h) = (r * 2.0, r * 2.4);
		let ry = w * 0.18;
		let (top, bottom) = (node.y - h / 2.0 + ry, node.y + h / 2.0 - ry);

		surface.save();
		let blur = glow(node);
		if blur > 0.0 {
			surface.set_shadow(blur, node.color);
		}

		// Cylinder: body, bottom cap, top cap.
		surface.set_fill(node.color);
		surface.fill_rect(node.x - r, top, w, bottom - top);
		surface.fill_ellipse(node.x, bottom, r, ry);
		surface.fill_ellipse(node.x, top, r, ry);
		surface.set_shadow(0.0, "transparent");
		surface.set_stroke("rgba(255, 255, 255, 0.6)", 1.0);
		surface.stroke_ellipse(node.x, top, r, ry);

		surface.set_global_alpha(0.35);
		surface.set_fill("#ffffff");
		surface.fill_ellipse(node.x, (top + bottom) / 2.0, r, ry);
		reset_paint(surface);
	}
}

fn draw_decorations<S: Surface>(surface: &S, decorations: &[Decoration], logos: &LogoAtlas<S::Image>) {
	for d in decorations {
		surface.save();
		surface.translate(d.x, d.y);
		surface.rotate(d.rotation);
		surface.set_global_alpha(d.opacity);

		match &d.glyph {
			Glyph::Binary(bits) => {
				surface.set_font(&format!("{:.0}px monospace", d.size));
				surface.set_fill(BINARY_COLOR);
				surface.fill_text(bits, 0.0, 0.0);
			}
			Glyph::Label(label) => {
				surface.set_font(&format!("bold {:.0}px sans-serif", d.size));
				surface.set_fill(LABEL_COLOR);
				surface.fill_text(label, 0.0, 0.0);
			}
			Glyph::Logo(logo) => draw_logo(surface, *logo, d.size, logos),
			Glyph::Neural => draw_neural(surface, d.size),
		}
		reset_paint(surface);
	}
}

fn draw_logo<S: Surface>(surface: &S, logo: Logo, size: f64, logos: &LogoAtlas<S::Image>) {
	match logos.image(logo) {
		Some(image) => {
			let aspect = S::image_aspect(image);
			let (w, h) = if aspect >= 1.0 {
				(size, size / aspect)
			} else {
				(size * aspect, size)
			};
			surface.draw_image(image, -w / 2.0, -h / 2.0, w, h);
		}
		None => {
			surface.set_font(&format!("bold {:.0}px sans-serif", size * 0.45));
			surface.set_stroke(logo.tint().unwrap_or(LOGO_OUTLINE), 1.0);
			surface.stroke_text(&logo.abbreviation(), 0.0, 0.0);
		}
	}
}

fn draw_neural<S: Surface>(surface: &S, size: f64) {
	let r = size / 2.0;
	let points: Vec<(f64, f64)> = (0..3)
		.map(|i| {
			let a = i as f64 * TAU / 3.0;
			(r * a.cos(), r * a.sin())
		})
		.collect();

	surface.set_stroke(NEURAL_COLOR, 1.0);
	for (i, &(x1, y1)) in points.iter().enumerate() {
		let (x2, y2) = points[(i + 1) % points.len()];
		surface.line(x1, y1, x2, y2);
		surface.line(x1, y1, 0.0, 0.0);
	}
	surface.set_fill(NEURAL_COLOR);
	for &(x, y) in points.iter().chain(std::iter::once(&(0.0, 0.0))) {
		surface.fill_ellipse(x, y, 2.5, 2.5);
	}
}
