// Drawing backend for the particle field. The field only ever clears,
// fills circles and strokes lines, so that is all a surface has to do.

use crate::color::Color;
use glm::DVec2;
use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

pub trait Surface {
    type Error;

    fn clear(&mut self, width: f64, height: f64, color: Color) -> Result<(), Self::Error>;

    fn fill_circle(
        &mut self,
        center: &DVec2,
        radius: f64,
        color: Color,
        alpha: f64,
    ) -> Result<(), Self::Error>;

    fn stroke_line(
        &mut self,
        from: &DVec2,
        to: &DVec2,
        width: f64,
        color: Color,
        alpha: f64,
    ) -> Result<(), Self::Error>;
}

#[allow(deprecated)]
impl Surface for CanvasRenderingContext2d {
    type Error = JsValue;

    fn clear(&mut self, width: f64, height: f64, color: Color) -> Result<(), JsValue> {
        self.set_fill_style(&JsValue::from_str(&color.to_css(1.0)));
        self.fill_rect(0.0, 0.0, width, height);
        Ok(())
    }

    fn fill_circle(
        &mut self,
        center: &DVec2,
        radius: f64,
        color: Color,
        alpha: f64,
    ) -> Result<(), JsValue> {
        self.begin_path();
        self.arc(center.x, center.y, radius, 0.0, std::f64::consts::PI * 2.0)?;
        self.set_fill_style(&JsValue::from_str(&color.to_css(alpha)));
        self.fill();
        Ok(())
    }

    fn stroke_line(
        &mut self,
        from: &DVec2,
        to: &DVec2,
        width: f64,
        color: Color,
        alpha: f64,
    ) -> Result<(), JsValue> {
        self.set_stroke_style(&JsValue::from_str(&color.to_css(alpha)));
        self.set_line_width(width);
        self.begin_path();
        self.move_to(from.x, from.y);
        self.line_to(to.x, to.y);
        self.stroke();
        Ok(())
    }
}
