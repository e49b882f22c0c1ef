use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use super::logos::{Logo, LogoAtlas};
use super::surface::Surface;

/// A loaded logo, recolored onto an off-screen canvas when the logo has a tint.
#[derive(Clone, Debug)]
pub enum Bitmap {
	Image(HtmlImageElement),
	Tinted(HtmlCanvasElement),
}

fn aspect(w: f64, h: f64) -> f64 {
	if w > 0.0 && h > 0.0 { w / h } else { 1.0 }
}

impl Surface for CanvasRenderingContext2d {
	type Image = Bitmap;

	fn image_aspect(image: &Bitmap) -> f64 {
		match image {
			Bitmap::Image(img) => aspect(img.natural_width() as f64, img.natural_height() as f64),
			Bitmap::Tinted(canvas) => aspect(canvas.width() as f64, canvas.height() as f64),
		}
	}

	fn clear(&self, width: f64, height: f64, color: &str) {
		self.set_fill_style_str(color);
		self.fill_rect(0.0, 0.0, width, height);
	}

	fn save(&self) {
		CanvasRenderingContext2d::save(self);
	}

	fn restore(&self) {
		CanvasRenderingContext2d::restore(self);
	}

	fn translate(&self, x: f64, y: f64) {
		let _ = CanvasRenderingContext2d::translate(self, x, y);
	}

	fn rotate(&self, angle: f64) {
		let _ = CanvasRenderingContext2d::rotate(self, angle);
	}

	fn set_global_alpha(&self, alpha: f64) {
		CanvasRenderingContext2d::set_global_alpha(self, alpha);
	}

	fn set_shadow(&self, blur: f64, color: &str) {
		self.set_shadow_blur(blur);
		self.set_shadow_color(color);
	}

	fn set_fill(&self, color: &str) {
		self.set_fill_style_str(color);
	}

	fn set_stroke(&self, color: &str, line_width: f64) {
		self.set_stroke_style_str(color);
		self.set_line_width(line_width);
	}

	fn set_font(&self, font: &str) {
		CanvasRenderingContext2d::set_font(self, font);
		self.set_text_align("center");
		self.set_text_baseline("middle");
	}

	fn fill_rect(&self, x: f64, y: f64, w: f64, h: f64) {
		CanvasRenderingContext2d::fill_rect(self, x, y, w, h);
	}

	fn fill_ellipse(&self, x: f64, y: f64, rx: f64, ry: f64) {
		self.begin_path();
		let _ = self.ellipse(x, y, rx.max(0.0), ry.max(0.0), 0.0, 0.0, std::f64::consts::TAU);
		self.fill();
	}

	fn stroke_ellipse(&self, x: f64, y: f64, rx: f64, ry: f64) {
		self.begin_path();
		let _ = self.ellipse(x, y, rx.max(0.0), ry.max(0.0), 0.0, 0.0, std::f64::consts::TAU);
		self.stroke();
	}

	fn line(&self, x1: f64, y1: f64, x2: f64, y2: f64) {
		self.begin_path();
		self.move_to(x1, y1);
		self.line_to(x2, y2);
		self.stroke();
	}

	fn fill_text(&self, text: &str, x: f64, y: f64) {
		let _ = CanvasRenderingContext2d::fill_text(self, text, x, y);
	}

	fn stroke_text(&self, text: &str, x: f64, y: f64) {
		let _ = CanvasRenderingContext2d::stroke_text(self, text, x, y);
	}

	fn draw_image(&self, image: &Bitmap, x: f64, y: f64, w: f64, h: f64) {
		let _ = match image {
			Bitmap::Image(img) => self.draw_image_with_html_image_element_and_dw_and_dh(img, x, y, w, h),
			Bitmap::Tinted(canvas) => {
				self.draw_image_with_html_canvas_element_and_dw_and_dh(canvas, x, y, w, h)
			}
		};
	}
}

/// Returns the 2-D context of `canvas`, if the browser provides one.
pub fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas
		.get_context("2d")
		.ok()
		.flatten()
		.and_then(|ctx| ctx.dyn_into().ok())
}

/// Paints `color` over the opaque pixels of `img` on an off-screen canvas.
fn tint(img: &HtmlImageElement, color: &str) -> Option<HtmlCanvasElement> {
	let document = web_sys::window()?.document()?;
	let canvas: HtmlCanvasElement = document.create_element("canvas").ok()?.dyn_into().ok()?;
	let (w, h) = (img.natural_width(), img.natural_height());
	canvas.set_width(w);
	canvas.set_height(h);

	let ctx = context_2d(&canvas)?;
	ctx.draw_image_with_html_image_element(img, 0.0, 0.0).ok()?;
	ctx.set_global_composite_operation("source-in").ok()?;
	ctx.set_fill_style_str(color);
	ctx.fill_rect(0.0, 0.0, w as f64, h as f64);
	Some(canvas)
}

/// Starts loading every logo. Results land in `atlas` as they arrive; failures are permanent.
pub fn load_logos(atlas: Rc<RefCell<LogoAtlas<Bitmap>>>) {
	for logo in Logo::ALL {
		if !atlas.borrow().is_pending(logo) {
			continue;
		}
		let Ok(img) = HtmlImageElement::new() else {
			warn!("Cannot create image element for logo {}", logo.id());
			atlas.borrow_mut().resolve(logo, None);
			continue;
		};

		let (atlas_load, loaded) = (atlas.clone(), img.clone());
		let on_load = Closure::once_into_js(move || {
			let bitmap = match logo.tint() {
				Some(color) => tint(&loaded, color).map(Bitmap::Tinted).unwrap_or_else(|| {
					warn!("Could not recolor logo {}, drawing it untinted", logo.id());
					Bitmap::Image(loaded.clone())
				}),
				None => Bitmap::Image(loaded),
			};
			debug!("Loaded logo {}", logo.id());
			atlas_load.borrow_mut().resolve(logo, Some(bitmap));
		});

		let atlas_err = atlas.clone();
		let on_error = Closure::once_into_js(move || {
			warn!("Failed to load logo {}, using text fallback", logo.asset_path());
			atlas_err.borrow_mut().resolve(logo, None);
		});

		img.set_onload(Some(on_load.unchecked_ref()));
		img.set_onerror(Some(on_error.unchecked_ref()));
		img.set_src(&logo.asset_path());
	}
}
