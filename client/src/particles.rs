use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::CanvasRenderingContext2d;

use crate::app::IsMobile;
use crate::frame_loop::FrameLoop;

const DESKTOP_PARTICLE_COUNT: usize = 80;
const MOBILE_PARTICLE_COUNT: usize = 20;
const CONNECTION_DISTANCE: f64 = 120.0;
const DESKTOP_FRAME_MS: f64 = 1000.0 / 60.0;
const MOBILE_FRAME_MS: f64 = 1000.0 / 30.0;
const MAX_DPR: f64 = 1.5;

struct Particle {
    x: f64,
    y: f64,
    vx: f64,
    vy: f64,
    size: f64,
    opacity: f64,
}

impl Particle {
    fn random(width: f64, height: f64) -> Self {
        Self {
            x: js_sys::Math::random() * width,
            y: js_sys::Math::random() * height,
            vx: (js_sys::Math::random() - 0.5) * 0.45,
            vy: (js_sys::Math::random() - 0.5) * 0.45,
            size: js_sys::Math::random() * 2.0 + 0.5,
            opacity: js_sys::Math::random() * 0.5 + 0.2,
        }
    }

    /// Advance one frame, bouncing off the canvas edges.
    fn step(&mut self, width: f64, height: f64) {
        self.x += self.vx;
        self.y += self.vy;
        if self.x < 0.0 || self.x > width {
            self.vx = -self.vx;
        }
        if self.y < 0.0 || self.y > height {
            self.vy = -self.vy;
        }
    }
}

thread_local! {
    static PARTICLE_LOOP: RefCell<Option<FrameLoop>> = const { RefCell::new(None) };
}

fn prefers_reduced_motion() -> bool {
    web_sys::window()
        .and_then(|w| w.match_media("(prefers-reduced-motion: reduce)").ok())
        .flatten()
        .map(|m| m.matches())
        .unwrap_or(false)
}

fn window_dimensions() -> (f64, f64) {
    let Some(window) = web_sys::window() else {
        return (0.0, 0.0);
    };
    let w = window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);
    let h = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);
    (w, h)
}

fn draw_frame(
    ctx: &CanvasRenderingContext2d,
    particles: &mut [Particle],
    width: f64,
    height: f64,
    connections: bool,
) {
    // Translucent fill leaves short motion trails.
    ctx.set_fill_style_str("rgba(0, 0, 0, 0.05)");
    ctx.fill_rect(0.0, 0.0, width, height);

    for particle in particles.iter_mut() {
        particle.step(width, height);
        ctx.begin_path();
        let _ = ctx.arc(particle.x, particle.y, particle.size, 0.0, std::f64::consts::TAU);
        ctx.set_fill_style_str(&format!("rgba(100, 200, 255, {})", particle.opacity));
        ctx.fill();
    }

    if !connections {
        return;
    }
    ctx.set_line_width(0.5);
    for i in 0..particles.len() {
        for j in (i + 1)..particles.len() {
            let dx = particles[i].x - particles[j].x;
            let dy = particles[i].y - particles[j].y;
            let distance = (dx * dx + dy * dy).sqrt();
            if distance < CONNECTION_DISTANCE {
                ctx.begin_path();
                ctx.move_to(particles[i].x, particles[i].y);
                ctx.line_to(particles[j].x, particles[j].y);
                ctx.set_stroke_style_str(&format!(
                    "rgba(100, 200, 255, {})",
                    0.12 * (1.0 - distance / CONNECTION_DISTANCE)
                ));
                ctx.stroke();
            }
        }
    }
}

/// Decorative drifting-particle layer behind the dashboard.
#[component]
pub fn ParticleBackground() -> impl IntoView {
    let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
    let IsMobile(is_mobile) = expect_context();

    Effect::new(move || {
        let Some(canvas_el) = canvas_ref.get() else {
            return;
        };
        let canvas: &web_sys::HtmlCanvasElement = &canvas_el;
        let Some(ctx) = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
        else {
            return;
        };

        let mobile = is_mobile.get_untracked();
        let reduced_motion = prefers_reduced_motion();
        let (width, height) = window_dimensions();
        let dpr = web_sys::window()
            .map(|w| w.device_pixel_ratio())
            .unwrap_or(1.0)
            .min(MAX_DPR);
        canvas.set_width((width * dpr) as u32);
        canvas.set_height((height * dpr) as u32);
        let _ = ctx.scale(dpr, dpr);

        let particle_count = if reduced_motion {
            0
        } else if mobile {
            MOBILE_PARTICLE_COUNT
        } else {
            DESKTOP_PARTICLE_COUNT
        };
        let particles: Rc<RefCell<Vec<Particle>>> = Rc::new(RefCell::new(
            (0..particle_count)
                .map(|_| Particle::random(width, height))
                .collect(),
        ));
        let connections = !reduced_motion && !mobile;
        let frame_ms = if mobile { MOBILE_FRAME_MS } else { DESKTOP_FRAME_MS };

        let animation = FrameLoop::new(frame_ms, move || {
            draw_frame(
                &ctx,
                &mut particles.borrow_mut(),
                width,
                height,
                connections,
            );
        });
        if !reduced_motion {
            animation.start();
        }
        PARTICLE_LOOP.with(|slot| {
            *slot.borrow_mut() = Some(animation);
        });
    });

    on_cleanup(|| {
        PARTICLE_LOOP.with(|slot| {
            slot.borrow_mut().take();
        });
    });

    view! {
        <canvas
            node_ref=canvas_ref
            style="position: fixed; inset: 0; pointer-events: none; z-index: 0; background: radial-gradient(ellipse at bottom, #0a0e27 0%, #000000 100%);"
        />
    }
}
