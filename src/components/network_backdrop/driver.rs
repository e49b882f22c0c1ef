use log::{debug, info};
use rand::Rng;

use super::logos::LogoAtlas;
use super::render;
use super::surface::Surface;
use super::types::{Scene, Viewport};

/// Upper bound on the simulated step per frame.
pub const MAX_FRAME_DT_MS: f64 = 100.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverState {
	Idle,
	Running,
	Stopped,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
	/// Not ready yet: nothing was updated or drawn.
	Skipped,
	Drawn,
	/// The driver was stopped; the host should not reschedule.
	Halted,
}

/// Owns the scene and advances it once per host frame.
pub struct FrameDriver<R> {
	state: DriverState,
	scene: Option<Scene>,
	last_frame: Option<f64>,
	rng: R,
}

impl<R: Rng> FrameDriver<R> {
	pub fn new(rng: R) -> Self {
		Self {
			state: DriverState::Idle,
			scene: None,
			last_frame: None,
			rng,
		}
	}

	pub fn state(&self) -> DriverState {
		self.state
	}

	#[cfg(test)]
	pub fn scene(&self) -> Option<&Scene> {
		self.scene.as_ref()
	}

	/// Builds the first scene and starts running. Has no effect unless idle.
	pub fn start(&mut self, viewport: Viewport) {
		if self.state != DriverState::Idle {
			return;
		}
		self.state = DriverState::Running;
		info!("Network backdrop started at {}x{}", viewport.width, viewport.height);
		self.rebuild(viewport);
	}

	/// Discards the scene and builds a fresh one for `viewport`.
	pub fn resize(&mut self, viewport: Viewport) {
		if self.state != DriverState::Running {
			return;
		}
		self.rebuild(viewport);
	}

	fn rebuild(&mut self, viewport: Viewport) {
		debug!("Rebuilding scene for {}x{}", viewport.width, viewport.height);
		self.scene = Some(Scene::new(viewport, &mut self.rng));
	}

	/// Safe to call repeatedly, and before [`FrameDriver::start`].
	pub fn stop(&mut self) {
		if self.state == DriverState::Stopped {
			return;
		}
		self.state = DriverState::Stopped;
		self.scene = None;
		self.last_frame = None;
		info!("Network backdrop stopped");
	}

	/// Runs one frame at host timestamp `now_ms`: update, then render.
	pub fn frame<S: Surface>(
		&mut self,
		now_ms: f64,
		surface: Option<&S>,
		logos: &LogoAtlas<S::Image>,
	) -> FrameOutcome {
		if self.state == DriverState::Stopped {
			return FrameOutcome::Halted;
		}
		let dt = self
			.last_frame
			.map_or(0.0, |last| (now_ms - last).clamp(0.0, MAX_FRAME_DT_MS));
		self.last_frame = Some(now_ms);

		let (Some(scene), Some(surface)) = (self.scene.as_mut(), surface) else {
			return FrameOutcome::Skipped;
		};
		if scene.hub().is_none() {
			return FrameOutcome::Skipped;
		}
		scene.update(dt, now_ms, &mut self.rng);
		render::render(surface, scene, logos);
		FrameOutcome::Drawn
	}
}
