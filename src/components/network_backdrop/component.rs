use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use leptos::leptos_dom::helpers::{TimeoutHandle, set_timeout_with_handle};
use leptos::prelude::*;
use log::{info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use send_wrapper::SendWrapper;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Window};

use super::canvas::{self, Bitmap};
use super::driver::{DriverState, FrameDriver, FrameOutcome};
use super::logos::LogoAtlas;
use super::types::Viewport;

/// The reported device pixel ratio, or 1 when it is non-finite or not positive.
fn pixel_ratio(reported: f64) -> f64 {
	if reported.is_finite() && reported > 0.0 { reported } else { 1.0 }
}

/// Backing-store size in device pixels for a CSS size.
fn backing_size(css_width: f64, css_height: f64, dpr: f64) -> (u32, u32) {
	((css_width * dpr).round() as u32, (css_height * dpr).round() as u32)
}

/// Everything the mounted canvas owns. Torn down exactly once by [`Backdrop::teardown`].
struct Backdrop {
	canvas: HtmlCanvasElement,
	context: Option<CanvasRenderingContext2d>,
	driver: RefCell<FrameDriver<StdRng>>,
	logos: Rc<RefCell<LogoAtlas<Bitmap>>>,
	startup: Cell<Option<TimeoutHandle>>,
	frame_id: Cell<Option<i32>>,
	animate: RefCell<Option<Closure<dyn FnMut(f64)>>>,
	resize_cb: RefCell<Option<Closure<dyn FnMut()>>>,
}

impl Backdrop {
	fn new(canvas: HtmlCanvasElement) -> Self {
		let context = canvas::context_2d(&canvas);
		if context.is_none() {
			warn!("2d context unavailable, frames will be skipped");
		}
		let seed = (js_sys::Math::random() * u64::MAX as f64) as u64;
		Self {
			canvas,
			context,
			driver: RefCell::new(FrameDriver::new(StdRng::seed_from_u64(seed))),
			logos: Rc::new(RefCell::new(LogoAtlas::default())),
			startup: Cell::new(None),
			frame_id: Cell::new(None),
			animate: RefCell::new(None),
			resize_cb: RefCell::new(None),
		}
	}

	/// Sizes the backing store to the parent's CSS size times the device pixel ratio.
	fn measure(&self, window: &Window) -> Viewport {
		let (w, h) = self
			.canvas
			.parent_element()
			.map(|p| (p.client_width() as f64, p.client_height() as f64))
			.filter(|&(w, h)| w > 0.0 && h > 0.0)
			.unwrap_or_else(|| {
				(
					window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(800.0),
					window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(600.0),
				)
			});
		let dpr = pixel_ratio(window.device_pixel_ratio());

		let (bw, bh) = backing_size(w, h, dpr);
		self.canvas.set_width(bw);
		self.canvas.set_height(bh);
		let style = web_sys::HtmlElement::style(&self.canvas);
		let _ = style.set_property("width", &format!("{w}px"));
		let _ = style.set_property("height", &format!("{h}px"));
		if let Some(ctx) = &self.context {
			let _ = ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
		}
		Viewport::new(w, h)
	}

	fn launch(self: &Rc<Self>) {
		self.startup.set(None);
		let Some(window) = web_sys::window() else {
			warn!("No window, network backdrop not started");
			return;
		};
		let viewport = self.measure(&window);
		self.driver.borrow_mut().start(viewport);

		let on_resize = self.clone();
		*self.resize_cb.borrow_mut() = Some(Closure::new(move || on_resize.resize()));
		if let Some(ref cb) = *self.resize_cb.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let on_frame = self.clone();
		*self.animate.borrow_mut() = Some(Closure::new(move |now: f64| on_frame.tick(now)));
		self.schedule();
	}

	fn schedule(&self) {
		let Some(window) = web_sys::window() else {
			return;
		};
		if let Some(ref cb) = *self.animate.borrow() {
			if let Ok(id) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
				self.frame_id.set(Some(id));
			}
		}
	}

	fn tick(&self, now: f64) {
		self.frame_id.set(None);
		let outcome =
			self.driver
				.borrow_mut()
				.frame(now, self.context.as_ref(), &self.logos.borrow());
		if outcome != FrameOutcome::Halted {
			self.schedule();
		}
	}

	fn resize(&self) {
		if self.driver.borrow().state() != DriverState::Running {
			return;
		}
		let Some(window) = web_sys::window() else {
			return;
		};
		let viewport = self.measure(&window);
		self.driver.borrow_mut().resize(viewport);
	}

	/// Cancels the startup delay and pending frame, detaches the resize listener and stops the driver.
	fn teardown(&self) {
		if let Some(handle) = self.startup.take() {
			handle.clear();
		}
		let window = web_sys::window();
		if let (Some(id), Some(window)) = (self.frame_id.take(), &window) {
			let _ = window.cancel_animation_frame(id);
		}
		if let (Some(cb), Some(window)) = (self.resize_cb.borrow_mut().take(), &window) {
			let _ = window.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}
		self.animate.borrow_mut().take();
		self.driver.borrow_mut().stop();
	}
}

/// Full-bleed animated cluster topology drawn behind the console.
#[component]
pub fn NetworkBackdrop(
	/// Delay before the first measurement, letting layout settle.
	#[prop(default = 100)]
	startup_delay_ms: u64,
	#[prop(default = "network-backdrop")] class: &'static str,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let mounted: Rc<RefCell<Option<Rc<Backdrop>>>> = Rc::new(RefCell::new(None));
	let mounted_init = mounted.clone();

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if mounted_init.borrow().is_some() {
			return;
		}
		let backdrop = Rc::new(Backdrop::new(canvas.into()));
		canvas::load_logos(backdrop.logos.clone());

		let delayed = backdrop.clone();
		match set_timeout_with_handle(
			move || delayed.launch(),
			Duration::from_millis(startup_delay_ms),
		) {
			Ok(handle) => backdrop.startup.set(Some(handle)),
			Err(_) => warn!("Could not schedule network backdrop startup"),
		}
		info!("Network backdrop mounted");
		*mounted_init.borrow_mut() = Some(backdrop);
	});

	let cleanup = SendWrapper::new(mounted);
	on_cleanup(move || {
		if let Some(backdrop) = cleanup.borrow_mut().take() {
			backdrop.teardown();
		}
	});

	view! {
		<canvas
			node_ref=canvas_ref
			class=class
			style="display: block; position: absolute; inset: 0; pointer-events: none;"
		/>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn pixel_ratio_below_one_is_kept() {
		assert_eq!(pixel_ratio(0.5), 0.5);
		assert_eq!(pixel_ratio(2.0), 2.0);
	}

	#[test]
	fn invalid_pixel_ratio_falls_back_to_one() {
		assert_eq!(pixel_ratio(0.0), 1.0);
		assert_eq!(pixel_ratio(-2.0), 1.0);
		assert_eq!(pixel_ratio(f64::NAN), 1.0);
		assert_eq!(pixel_ratio(f64::INFINITY), 1.0);
	}

	#[test]
	fn backing_store_scales_with_pixel_ratio() {
		assert_eq!(backing_size(800.0, 600.0, 2.0), (1600, 1200));
		assert_eq!(backing_size(800.0, 600.0, 0.75), (600, 450));
		assert_eq!(backing_size(333.0, 101.0, 1.5), (500, 152));
	}
}
