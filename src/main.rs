//! Laser Link entry point
//!
//! In the browser this wires the page controls to the sequencer and paints the
//! canvas while a transmission is in flight. Native builds run one
//! transmission headlessly and print its report.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod web_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlInputElement, KeyboardEvent, Window};

    use laser_link::consts::{CANVAS_HEIGHT, SPEED_DEFAULT};
    use laser_link::renderer::{CanvasSurface, Renderer};
    use laser_link::sim::{Layout, SimEvent, Stage, StageSequencer};
    use laser_link::ui::{ConnectionStatus, NO_MESSAGE, StatusLine, TransmissionReport};
    use laser_link::{Settings, StartError};

    const CANVAS_ID: &str = "simulation-canvas";

    /// Wall clock shared by input handlers and the frame loop (ms)
    fn now() -> f64 {
        js_sys::Date::now()
    }

    /// Page state: simulation, painter and the DOM it reports to
    struct App {
        sequencer: StageSequencer,
        renderer: Renderer,
        surface: CanvasSurface,
        canvas: HtmlCanvasElement,
        window: Window,
        document: Document,
        settings: Settings,
        /// Outstanding requestAnimationFrame id
        frame_request: Option<i32>,
    }

    impl App {
        fn set_text(&self, id: &str, text: &str) {
            if let Some(el) = self.document.get_element_by_id(id) {
                el.set_text_content(Some(text));
            }
        }

        fn set_class(&self, id: &str, class: &str) {
            if let Some(el) = self.document.get_element_by_id(id) {
                let _ = el.set_attribute("class", class);
            }
        }

        fn input(&self) -> Option<HtmlInputElement> {
            self.document
                .get_element_by_id("message-input")
                .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        }

        /// Canvas width follows its container; height is fixed
        fn resize_canvas(&mut self) {
            let width = self
                .canvas
                .parent_element()
                .map(|parent| parent.client_width())
                .filter(|w| *w > 0)
                .unwrap_or(self.canvas.width() as i32);
            self.canvas.set_width(width as u32);
            self.canvas.set_height(CANVAS_HEIGHT as u32);

            let layout = Layout::new(width as f32);
            self.renderer.resize(layout);
            self.sequencer.set_layout(layout);
        }

        fn render(&mut self) {
            self.renderer.render(self.sequencer.state(), &mut self.surface);
        }

        fn send(&mut self) {
            let message = self.input().map(|input| input.value()).unwrap_or_default();
            match self.sequencer.start(&message, now()) {
                Ok(()) => {}
                Err(StartError::EmptyMessage) => {
                    let _ = self.window.alert_with_message(&StartError::EmptyMessage.to_string());
                }
                Err(StartError::AlreadyRunning) => {
                    log::debug!("Send ignored while a transmission is running");
                }
            }
        }

        /// Copy sequencer notifications into the page
        fn apply_events(&mut self) {
            for event in self.sequencer.drain_events() {
                match event {
                    SimEvent::StageEntered(stage) => self.show_stage(stage),
                    SimEvent::DemoSelected(message) => {
                        if let Some(input) = self.input() {
                            input.set_value(&message);
                        }
                    }
                    SimEvent::Decoded(text) => self.set_text("received-message", &text),
                    SimEvent::Completed { .. } => {
                        let report = TransmissionReport::from_state(self.sequencer.state());
                        self.set_text("transmission-time", &report.elapsed_text());
                    }
                    SimEvent::DemoRejected(err) => log::warn!("Demo not started: {err}"),
                }
            }
        }

        fn show_stage(&self, stage: Stage) {
            let status = StatusLine::for_stage(stage);
            self.set_text("status-indicator", status.text);
            self.set_class("status-indicator", status.category.css_class());

            let connection = ConnectionStatus::for_stage(stage);
            self.set_text("connection-status", connection.label());
            self.set_class("connection-dot", connection.dot_class());

            match stage {
                Stage::Idle => {
                    self.set_text("original-message", NO_MESSAGE);
                    self.set_text("binary-data", NO_MESSAGE);
                    self.set_text("received-message", NO_MESSAGE);
                    self.set_text("bits-count", "0");
                    self.set_text("transmission-time", "0ms");
                }
                Stage::Encoding => {
                    let report = TransmissionReport::from_state(self.sequencer.state());
                    self.set_text("original-message", &report.original);
                    self.set_text("binary-data", &report.binary);
                    self.set_text("bits-count", &report.bit_count.to_string());
                    self.set_text("received-message", NO_MESSAGE);
                    self.set_text("transmission-time", "0ms");
                }
                _ => {}
            }
        }

        fn cancel_frame(&mut self) {
            if let Some(id) = self.frame_request.take() {
                let _ = self.window.cancel_animation_frame(id);
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };
        let Some(canvas) = document
            .get_element_by_id(CANVAS_ID)
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No canvas element #{CANVAS_ID}");
            return;
        };

        let settings = canvas
            .get_attribute("data-settings")
            .map(|json| Settings::from_json_or_default(&json))
            .unwrap_or_default();
        let surface = match CanvasSurface::from_canvas(&canvas) {
            Ok(surface) => surface,
            Err(err) => {
                log::error!("Canvas 2D context unavailable: {err:?}");
                return;
            }
        };

        let layout = Layout::new(canvas.width() as f32);
        let seed = now() as u64;
        let sequencer = StageSequencer::from_settings(&settings, seed, layout);
        log::info!(
            "Laser Link ready (speed {}, quality {}, seed {})",
            settings.speed,
            settings.quality.as_str(),
            settings.seed.unwrap_or(seed)
        );

        let app = Rc::new(RefCell::new(App {
            sequencer,
            renderer: Renderer::new(layout, &settings),
            surface,
            canvas,
            window,
            document,
            settings,
            frame_request: None,
        }));

        {
            let mut a = app.borrow_mut();
            a.resize_canvas();
            a.show_stage(Stage::Idle);
            a.render();
        }

        setup_controls(app.clone());
        setup_resize(app);
    }

    /// Start the frame loop unless one is already scheduled or nothing moves
    fn ensure_loop(app: &Rc<RefCell<App>>) {
        let idle = {
            let a = app.borrow();
            a.frame_request.is_some() || !a.sequencer.wants_frames()
        };
        if !idle {
            request_animation_frame(app.clone());
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let window = app.borrow().window.clone();
        let callback = app.clone();
        let closure = Closure::once_into_js(move |_time: f64| frame_loop(callback));
        match window.request_animation_frame(closure.unchecked_ref()) {
            Ok(id) => app.borrow_mut().frame_request = Some(id),
            Err(err) => log::error!("requestAnimationFrame failed: {err:?}"),
        }
    }

    fn frame_loop(app: Rc<RefCell<App>>) {
        let keep_going = {
            let mut a = app.borrow_mut();
            a.frame_request = None;
            a.sequencer.frame(now());
            a.apply_events();
            a.render();
            a.sequencer.wants_frames()
        };
        if keep_going {
            request_animation_frame(app);
        }
    }

    /// Run `action` on the app, then sync the page and the frame loop
    fn command(app: &Rc<RefCell<App>>, action: impl FnOnce(&mut App)) {
        {
            let mut a = app.borrow_mut();
            action(&mut a);
            a.apply_events();
            a.render();
        }
        ensure_loop(app);
    }

    fn setup_button(app: Rc<RefCell<App>>, id: &str, action: fn(&mut App)) {
        let Some(btn) = app.borrow().document.get_element_by_id(id) else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            command(&app, action);
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_controls(app: Rc<RefCell<App>>) {
        setup_button(app.clone(), "send-btn", App::send);
        setup_button(app.clone(), "reset-btn", |a| {
            a.cancel_frame();
            a.sequencer.reset();
        });
        setup_button(app.clone(), "demo-btn", |a| {
            a.sequencer.run_demo(now());
        });

        let input = app.borrow().input();
        if let Some(input) = input {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.key() == "Enter" {
                    command(&app, App::send);
                }
            });
            let _ =
                input.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        let slider = app
            .borrow()
            .document
            .get_element_by_id("speed-slider")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok());
        if let Some(slider) = slider {
            slider.set_value(&app.borrow().settings.speed.to_string());
            let target = slider.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let speed = target.value().parse().unwrap_or(SPEED_DEFAULT);
                let mut a = app.borrow_mut();
                a.settings.set_speed(speed);
                let factor = a.settings.speed_factor();
                a.sequencer.set_speed_factor(factor);
            });
            let _ =
                slider.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(app: Rc<RefCell<App>>) {
        let window = app.borrow().window.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut a = app.borrow_mut();
            a.resize_canvas();
            a.render();
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    web_app::run();
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use laser_link::Settings;
    use laser_link::renderer::{RecordingSurface, Renderer};
    use laser_link::sim::{Layout, SimEvent, Stage, StageSequencer};
    use laser_link::ui::TransmissionReport;

    /// Virtual frame length (60 Hz)
    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Give up after ten simulated minutes
    const MAX_FRAMES: u64 = 36_000;

    /// Command line: `[--speed N] [--seed N] [--quality low|medium|high] [message...]`
    #[derive(Debug, PartialEq)]
    pub struct Options {
        pub message: String,
        pub settings: Settings,
    }

    pub fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Options, String> {
        let mut settings = Settings::default();
        let mut words = Vec::new();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--speed" => {
                    let value = args.next().ok_or("--speed needs a value")?;
                    let speed = value
                        .parse()
                        .map_err(|_| format!("invalid speed: {value}"))?;
                    settings.set_speed(speed);
                }
                "--seed" => {
                    let value = args.next().ok_or("--seed needs a value")?;
                    let seed = value
                        .parse()
                        .map_err(|_| format!("invalid seed: {value}"))?;
                    settings.seed = Some(seed);
                }
                "--quality" => {
                    let value = args.next().ok_or("--quality needs a value")?;
                    settings.quality = laser_link::QualityPreset::parse(&value)
                        .ok_or_else(|| format!("unknown quality: {value}"))?;
                }
                _ => words.push(arg),
            }
        }
        let message = if words.is_empty() {
            "Hi".to_string()
        } else {
            words.join(" ")
        };
        Ok(Options { message, settings })
    }

    /// Drive one transmission on a virtual clock, painting every frame
    pub fn run(options: &Options) -> Result<TransmissionReport, String> {
        let layout = Layout::default();
        let mut sequencer = StageSequencer::from_settings(&options.settings, 0, layout);
        let renderer = Renderer::new(layout, &options.settings);
        let mut surface = RecordingSurface::new();

        let mut now = 0.0;
        sequencer
            .start(&options.message, now)
            .map_err(|err| err.to_string())?;

        for _ in 0..MAX_FRAMES {
            now += FRAME_MS;
            sequencer.frame(now);
            for event in sequencer.drain_events() {
                if let SimEvent::StageEntered(stage) = event {
                    log::debug!("t={now:.0}ms entered {}", stage.as_str());
                }
            }
            surface.clear();
            renderer.render(sequencer.state(), &mut surface);
            if sequencer.state().stage == Stage::Complete {
                log::info!(
                    "Complete after {} frames ({} draw calls in the last)",
                    sequencer.state().frames,
                    surface.commands().len()
                );
                return Ok(TransmissionReport::from_state(sequencer.state()));
            }
        }
        Err(format!("transmission did not complete within {MAX_FRAMES} frames"))
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let options = match headless::parse_args(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(2);
        }
    };
    log::info!("Laser Link (native) sending {:?}", options.message);

    match headless::run(&options).and_then(|report| report.to_json().map_err(|e| e.to_string())) {
        Ok(json) => println!("{json}"),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Entry point is wasm_main
}
