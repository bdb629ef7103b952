//! Carrom entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlCanvasElement;
    use web_sys::PointerEvent as DomPointerEvent;

    use carrom::Tuning;
    use carrom::consts::*;
    use carrom::platform::{PointerTracker, backing_size};
    use carrom::renderer::{Scene, SceneSync, SdfRenderState, Viewport};
    use carrom::sim::{CarromState, SimEvent, TickInput, tick};
    use glam::Vec2;

    /// Game instance holding all state
    struct Game {
        state: CarromState,
        scene: Scene,
        sync: SceneSync<usize>,
        render_state: Option<SdfRenderState>,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        viewport: Viewport,
        pointer: PointerTracker,
    }

    impl Game {
        fn new(tuning: Tuning) -> Self {
            let state = CarromState::new(tuning);
            let scene = Scene::new(state.board);
            Self {
                viewport: Viewport::new(tuning.board_size, tuning.board_size, tuning.board_size),
                state,
                scene,
                sync: SceneSync::new(),
                render_state: None,
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
                pointer: PointerTracker::default(),
            }
        }

        /// Keeps the previous mapping when the canvas has no area
        fn set_viewport(&mut self, w: f32, h: f32) {
            match Viewport::try_new(w, h, self.state.board.size) {
                Some(viewport) => self.viewport = viewport,
                None => log::warn!("Ignoring {}x{} viewport", w, h),
            }
        }

        /// Match backing store, GPU surface and input mapping to the canvas
        fn resize(&mut self, canvas: &HtmlCanvasElement) {
            let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
            let client_w = canvas.client_width();
            let client_h = canvas.client_height();
            let (width, height) = backing_size(client_w, client_h, dpr);
            if width == 0 || height == 0 {
                return;
            }
            canvas.set_width(width);
            canvas.set_height(height);
            if let Some(ref mut render_state) = self.render_state {
                render_state.resize(width, height);
            }
            self.set_viewport(client_w as f32, client_h as f32);
        }

        /// Convert a canvas-relative pointer position to board coordinates
        fn to_board(&self, event: &DomPointerEvent) -> Vec2 {
            self.viewport
                .screen_to_board(Vec2::new(event.offset_x() as f32, event.offset_y() as f32))
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                tick(&mut self.state, &self.input);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Pointer events are consumed by the first tick
                self.input.clear();

                for event in &self.state.events {
                    match event {
                        SimEvent::Shot { velocity } => {
                            log::debug!("Shot: ({:.2}, {:.2})", velocity.x, velocity.y)
                        }
                        SimEvent::Collision { coin, angle } => {
                            log::debug!("Striker hit coin {} at {:.2} rad", coin, angle)
                        }
                        SimEvent::WallBounce { disc, x, y } => {
                            log::trace!("{:?} bounced (x: {}, y: {})", disc, x, y)
                        }
                    }
                }
            }

            self.sync.sync(&self.state, &mut self.scene);
        }

        /// Render the current frame
        fn render(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&self.scene) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Carrom starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()
            .map_err(|_| "not a canvas")?;

        // Set canvas size
        let (width, height) = backing_size(
            canvas.client_width(),
            canvas.client_height(),
            window.device_pixel_ratio(),
        );
        canvas.set_width(width.max(1));
        canvas.set_height(height.max(1));

        let tuning = Tuning::load();
        let game = Rc::new(RefCell::new(Game::new(tuning)));
        game.borrow_mut()
            .set_viewport(canvas.client_width() as f32, canvas.client_height() as f32);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = SdfRenderState::new(surface, &adapter, width.max(1), height.max(1))
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        game.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(&canvas, game.clone());
        setup_resize_handler(&window, &canvas, game.clone());

        request_animation_frame(game);

        log::info!("Carrom running!");
        Ok(())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Press: start aiming
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: DomPointerEvent| {
                if event.button() != 0 {
                    return;
                }
                // Keep receiving moves/release when the pointer leaves the canvas
                let _ = canvas_clone.set_pointer_capture(event.pointer_id());
                let mut g = game.borrow_mut();
                let p = g.to_board(&event);
                if let Some(e) = g.pointer.press(p) {
                    g.input.push(e);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Drag: update aim line
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: DomPointerEvent| {
                let mut g = game.borrow_mut();
                let p = g.to_board(&event);
                if let Some(e) = g.pointer.moved(p) {
                    g.input.push(e);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Release: shoot
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: DomPointerEvent| {
                if event.button() != 0 {
                    return;
                }
                let mut g = game.borrow_mut();
                let p = g.to_board(&event);
                if let Some(e) = g.pointer.release(p) {
                    g.input.push(e);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Cancelled or capture lost: stop treating moves as drags
        for kind in ["pointercancel", "lostpointercapture"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: DomPointerEvent| {
                let mut g = game.borrow_mut();
                if g.pointer.is_down() {
                    log::debug!("Pointer {} while aiming, no shot", kind);
                    g.pointer.cancel();
                }
            });
            let _ = canvas.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize_handler(
        window: &web_sys::Window,
        canvas: &HtmlCanvasElement,
        game: Rc<RefCell<Game>>,
    ) {
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().resize(&canvas);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.render();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run().await
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Carrom (native) starting...");
    log::info!("Native mode has no window - run with `trunk serve` for the web version");

    run_headless_demo();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Play one scripted shot at the center coin and log how the board settles
#[cfg(not(target_arch = "wasm32"))]
fn run_headless_demo() {
    use carrom::Tuning;
    use carrom::sim::{CarromState, DiscId, PointerEvent, SimEvent, TickInput, step, tick};
    use glam::Vec2;

    const MAX_TICKS: u32 = 1_000;
    const REST_SPEED: f32 = 0.01;

    let mut state = CarromState::new(Tuning::load());
    let aim_at = state
        .disc(DiscId::Coin(0))
        .map_or(state.board.center(), |coin| coin.pos);

    let mut input = TickInput::default();
    input.push(PointerEvent::Down(state.striker.pos));
    input.push(PointerEvent::Drag(aim_at));
    input.push(PointerEvent::Up(aim_at + Vec2::new(4.0, -60.0)));
    tick(&mut state, &input);

    for _ in 0..MAX_TICKS {
        for event in &state.events {
            match event {
                SimEvent::Shot { velocity } => {
                    log::info!("Shot ({:.2}, {:.2})", velocity.x, velocity.y)
                }
                SimEvent::Collision { coin, angle } => log::info!(
                    "Tick {}: striker hit coin {} at {:.2} rad",
                    state.time_ticks,
                    coin,
                    angle
                ),
                SimEvent::WallBounce { disc, x, y } => log::info!(
                    "Tick {}: {:?} bounced (x: {}, y: {})",
                    state.time_ticks,
                    disc,
                    x,
                    y
                ),
            }
        }

        if state.is_settled(REST_SPEED) {
            break;
        }
        step(&mut state);
    }

    log::info!("Settled after {} ticks", state.time_ticks);
    for (id, disc) in state.discs() {
        log::info!("{:?} at ({:.1}, {:.1})", id, disc.pos.x, disc.pos.y);
    }
    match serde_json::to_string(&state) {
        Ok(json) => log::debug!("Final state: {}", json),
        Err(e) => log::warn!("Could not serialize state: {}", e),
    }
}
