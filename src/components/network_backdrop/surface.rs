/// The immediate-mode drawing calls the renderer needs from a 2-D context.
///
/// Coordinates are CSS pixels; implementations own any device-pixel scaling.
pub trait Surface {
	type Image;

	/// Width over height of a loaded image.
	fn image_aspect(image: &Self::Image) -> f64;

	fn clear(&self, width: f64, height: f64, color: &str);
	fn save(&self);
	fn restore(&self);
	fn translate(&self, x: f64, y: f64);
	fn rotate(&self, angle: f64);

	fn set_global_alpha(&self, alpha: f64);
	/// A zero `blur` disables the shadow.
	fn set_shadow(&self, blur: f64, color: &str);
	fn set_fill(&self, color: &str);
	fn set_stroke(&self, color: &str, line_width: f64);
	/// Sets the font; text is centered on the given point.
	fn set_font(&self, font: &str);

	fn fill_rect(&self, x: f64, y: f64, w: f64, h: f64);
	fn fill_ellipse(&self, x: f64, y: f64, rx: f64, ry: f64);
	fn stroke_ellipse(&self, x: f64, y: f64, rx: f64, ry: f64);
	fn line(&self, x1: f64, y1: f64, x2: f64, y2: f64);
	fn fill_text(&self, text: &str, x: f64, y: f64);
	fn stroke_text(&self, text: &str, x: f64, y: f64);
	fn draw_image(&self, image: &Self::Image, x: f64, y: f64, w: f64, h: f64);
}
