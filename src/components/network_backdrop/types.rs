use super::logos::Logo;

/// Size of the drawing area in CSS pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
	pub width: f64,
	pub height: f64,
}

impl Viewport {
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			width: width.max(0.0),
			height: height.max(0.0),
		}
	}

	pub fn center(&self) -> (f64, f64) {
		(self.width / 2.0, self.height / 2.0)
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Orbit {
	pub angle: f64,
	pub radius: f64,
	pub speed: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NodeKind {
	Hub,
	/// Position is derived from the orbit every step, never integrated.
	Satellite(Orbit),
	Floater,
}

#[derive(Clone, Debug)]
pub struct Node {
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	pub radius: f64,
	pub color: &'static str,
	pub phase: f64,
	pub kind: NodeKind,
}

impl Node {
	pub fn is_hub(&self) -> bool {
		matches!(self.kind, NodeKind::Hub)
	}

	pub fn is_satellite(&self) -> bool {
		matches!(self.kind, NodeKind::Satellite(_))
	}

	pub fn is_floater(&self) -> bool {
		matches!(self.kind, NodeKind::Floater)
	}

	pub fn distance_to(&self, other: &Node) -> f64 {
		(self.x - other.x).hypot(self.y - other.y)
	}
}

#[derive(Clone, Debug)]
pub struct Particle {
	/// Fraction of the link travelled, in `[0, 1)` while alive.
	pub progress: f64,
	pub speed: f64,
	pub size: f64,
	pub x: f64,
	pub y: f64,
}

/// A directed edge between two nodes of the same [`Scene`].
#[derive(Clone, Debug)]
pub struct Link {
	pub from: usize,
	pub to: usize,
	pub particles: Vec<Particle>,
}

impl Link {
	pub fn new(from: usize, to: usize) -> Self {
		Self {
			from,
			to,
			particles: Vec::new(),
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub enum Glyph {
	Binary(String),
	Label(&'static str),
	Logo(Logo),
	Neural,
}

impl Glyph {
	/// Text glyphs shimmer; their opacity is kept inside [`OPACITY_BAND`].
	pub fn shimmers(&self) -> bool {
		matches!(self, Glyph::Binary(_) | Glyph::Label(_))
	}
}

pub const OPACITY_BAND: (f64, f64) = (0.1, 0.7);

#[derive(Clone, Debug)]
pub struct Decoration {
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	pub glyph: Glyph,
	pub opacity: f64,
	pub size: f64,
	pub rotation: f64,
	pub rotation_speed: f64,
}

/// Every entity of one visualization, rebuilt wholesale on resize.
#[derive(Clone, Debug, Default)]
pub struct Scene {
	pub viewport: Viewport,
	/// The hub is always at index 0.
	pub nodes: Vec<Node>,
	pub links: Vec<Link>,
	pub decorations: Vec<Decoration>,
}

impl Scene {
	pub fn hub(&self) -> Option<&Node> {
		self.nodes.first().filter(|n| n.is_hub())
	}
}
