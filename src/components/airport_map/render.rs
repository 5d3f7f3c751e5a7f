use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::scene::Scene;
use super::state::LayoutController;
use super::types::Point;

const COUNTRY_FILL: &str = "#454644";
const BORDER_STROKE: &str = "white";
const LINK_STROKE: &str = "#00F095";
const NODE_FILL: &str = "orange";

pub fn render(state: &LayoutController, ctx: &CanvasRenderingContext2d) {
	let scene = state.scene();
	ctx.clear_rect(0.0, 0.0, scene.width, scene.height);
	draw_countries(scene, ctx);
	draw_borders(scene, ctx);
	draw_links(scene, ctx);
	draw_nodes(scene, ctx);
	if let Some((label, at)) = state.hover_label() {
		draw_label(ctx, label, at);
	}
}

fn trace(ctx: &CanvasRenderingContext2d, line: &[Point]) {
	let mut points = line.iter();
	if let Some(first) = points.next() {
		ctx.move_to(first.x, first.y);
		for p in points {
			ctx.line_to(p.x, p.y);
		}
	}
}

fn draw_countries(scene: &Scene, ctx: &CanvasRenderingContext2d) {
	if scene.country_opacity <= 0.0 {
		return;
	}
	ctx.set_global_alpha(scene.country_opacity);
	ctx.set_fill_style_str(COUNTRY_FILL);
	for country in &scene.countries {
		ctx.begin_path();
		for ring in &country.rings {
			trace(ctx, ring);
			ctx.close_path();
		}
		ctx.fill_with_canvas_winding_rule(web_sys::CanvasWindingRule::Evenodd);
	}
	ctx.set_global_alpha(1.0);
}

fn draw_borders(scene: &Scene, ctx: &CanvasRenderingContext2d) {
	ctx.set_stroke_style_str(BORDER_STROKE);
	ctx.set_line_width(1.0);
	ctx.begin_path();
	for line in &scene.borders {
		trace(ctx, line);
	}
	ctx.stroke();
}

fn draw_links(scene: &Scene, ctx: &CanvasRenderingContext2d) {
	ctx.set_stroke_style_str(LINK_STROKE);
	ctx.set_line_width(1.0);
	ctx.begin_path();
	for link in &scene.links {
		ctx.move_to(link.start.x, link.start.y);
		ctx.line_to(link.end.x, link.end.y);
	}
	ctx.stroke();
}

fn draw_nodes(scene: &Scene, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(NODE_FILL);
	for node in &scene.nodes {
		ctx.begin_path();
		let _ = ctx.arc(node.center.x, node.center.y, node.radius, 0.0, 2.0 * PI);
		ctx.fill();
	}
}

fn draw_label(ctx: &CanvasRenderingContext2d, label: &str, at: Point) {
	ctx.set_font("12px sans-serif");
	let width = ctx.measure_text(label).map(|m| m.width()).unwrap_or(0.0);
	let (x, y) = (at.x + 10.0, at.y - 10.0);
	ctx.set_fill_style_str("rgba(0, 0, 0, 0.75)");
	ctx.fill_rect(x - 4.0, y - 13.0, width + 8.0, 18.0);
	ctx.set_fill_style_str("white");
	let _ = ctx.fill_text(label, x, y);
}
