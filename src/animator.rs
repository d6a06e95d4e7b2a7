// Browser side of the particle field. Mounting sizes the canvas to the
// viewport, hooks the window listeners and starts the frame loop; unmounting
// (or dropping) cancels the pending frame and removes every listener.

use crate::config::FieldConfig;
use crate::field::ParticleField;
use crate::utils::Timer;
use std::cell::{Cell, Ref, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, Window};

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

// Everything acquired on mount. Dropping it releases all of it.
struct Listeners {
    window: Window,
    on_resize: Closure<dyn FnMut()>,
    on_mouse_move: Closure<dyn FnMut(MouseEvent)>,
    on_mouse_out: Closure<dyn FnMut()>,
    frame: FrameCallback,
    frame_id: Rc<Cell<Option<i32>>>,
}

impl Listeners {
    fn callbacks(&self) -> [(&'static str, &JsValue); 3] {
        [
            ("resize", self.on_resize.as_ref()),
            ("mousemove", self.on_mouse_move.as_ref()),
            ("mouseout", self.on_mouse_out.as_ref()),
        ]
    }

    fn attach(&self) -> Result<(), JsValue> {
        for (event, callback) in self.callbacks().iter() {
            self.window
                .add_event_listener_with_callback(event, callback.unchecked_ref())?;
        }
        Ok(())
    }

    fn request_frame(&self) -> Result<(), JsValue> {
        if let Some(callback) = self.frame.borrow().as_ref() {
            let id = self
                .window
                .request_animation_frame(callback.as_ref().unchecked_ref())?;
            self.frame_id.set(Some(id));
        }
        Ok(())
    }
}

impl Drop for Listeners {
    fn drop(&mut self) {
        if let Some(id) = self.frame_id.take() {
            if let Err(e) = self.window.cancel_animation_frame(id) {
                log::error!("failed to cancel animation frame: {:?}", e);
            }
        }
        // Breaks the closure's reference to itself
        self.frame.borrow_mut().take();

        for (event, callback) in self.callbacks().iter() {
            if let Err(e) = self
                .window
                .remove_event_listener_with_callback(event, callback.unchecked_ref())
            {
                log::error!("failed to remove {} listener: {:?}", event, e);
            }
        }
    }
}

fn viewport_size(window: &Window, fallback: (u32, u32)) -> (u32, u32) {
    let width = window.inner_width().ok().and_then(|v| v.as_f64());
    let height = window.inner_height().ok().and_then(|v| v.as_f64());
    match (width, height) {
        (Some(w), Some(h)) => (w as u32, h as u32),
        _ => fallback,
    }
}

#[wasm_bindgen]
pub struct AetherFlow {
    field: Option<Rc<RefCell<ParticleField>>>,
    frames: Rc<Cell<u64>>,
    listeners: Option<Listeners>,
}

#[wasm_bindgen]
impl AetherFlow {
    // Mount onto the `<canvas>` with the given id. A missing canvas or 2D
    // context gives back an inert instance instead of an error.
    pub fn mount(canvas_id: &str) -> Result<AetherFlow, JsValue> {
        let canvas = web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.get_element_by_id(canvas_id))
            .and_then(|element| element.dyn_into::<HtmlCanvasElement>().ok());
        match canvas {
            Some(canvas) => AetherFlow::mount_with_config(canvas, FieldConfig::default()),
            None => {
                log::debug!("no canvas with id '{}', particle field disabled", canvas_id);
                Ok(AetherFlow::inert())
            }
        }
    }

    #[wasm_bindgen(js_name = mountCanvas)]
    pub fn mount_canvas(canvas: HtmlCanvasElement) -> Result<AetherFlow, JsValue> {
        AetherFlow::mount_with_config(canvas, FieldConfig::default())
    }

    // Stop the frame loop and remove the window listeners. Safe to call twice.
    pub fn unmount(&mut self) {
        if self.listeners.take().is_some() {
            log::info!("particle field unmounted after {} frames", self.frames.get());
        }
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.listeners.is_some()
    }

    #[wasm_bindgen(js_name = particleCount)]
    pub fn particle_count(&self) -> usize {
        self.field
            .as_ref()
            .map(|field| field.borrow().particles().len())
            .unwrap_or(0)
    }

    #[wasm_bindgen(js_name = pointerPresent)]
    pub fn pointer_present(&self) -> bool {
        self.field
            .as_ref()
            .map(|field| field.borrow().pointer().is_present())
            .unwrap_or(false)
    }

    #[wasm_bindgen(js_name = framesRendered)]
    pub fn frames_rendered(&self) -> f64 {
        self.frames.get() as f64
    }
}

impl AetherFlow {
    fn inert() -> AetherFlow {
        AetherFlow {
            field: None,
            frames: Rc::new(Cell::new(0)),
            listeners: None,
        }
    }

    pub fn mount_with_config(
        canvas: HtmlCanvasElement,
        config: FieldConfig,
    ) -> Result<AetherFlow, JsValue> {
        let window = match web_sys::window() {
            Some(window) => window,
            None => return Ok(AetherFlow::inert()),
        };
        let context = match canvas.get_context("2d") {
            Ok(Some(context)) => context.dyn_into::<CanvasRenderingContext2d>().ok(),
            _ => None,
        };
        let mut context = match context {
            Some(context) => context,
            None => {
                log::debug!("canvas has no 2d context, particle field disabled");
                return Ok(AetherFlow::inert());
            }
        };

        let (width, height) = viewport_size(&window, (canvas.width(), canvas.height()));
        canvas.set_width(width);
        canvas.set_height(height);
        let field = ParticleField::new(width, height, config)
            .map_err(|e| JsValue::from_str(&e))?;
        let field = Rc::new(RefCell::new(field));
        let frames = Rc::new(Cell::new(0u64));

        let on_resize = {
            let field = field.clone();
            let window = window.clone();
            let canvas = canvas.clone();
            Closure::wrap(Box::new(move || {
                let (width, height) = viewport_size(&window, (canvas.width(), canvas.height()));
                canvas.set_width(width);
                canvas.set_height(height);
                field.borrow_mut().resize(width, height);
            }) as Box<dyn FnMut()>)
        };

        let on_mouse_move = {
            let field = field.clone();
            Closure::wrap(Box::new(move |event: MouseEvent| {
                field
                    .borrow_mut()
                    .set_pointer(event.client_x() as f64, event.client_y() as f64);
            }) as Box<dyn FnMut(MouseEvent)>)
        };

        let on_mouse_out = {
            let field = field.clone();
            Closure::wrap(Box::new(move || {
                field.borrow_mut().clear_pointer();
            }) as Box<dyn FnMut()>)
        };

        let frame: FrameCallback = Rc::new(RefCell::new(None));
        let frame_id = Rc::new(Cell::new(None));
        {
            let field = field.clone();
            let frames = frames.clone();
            let window = window.clone();
            let next = frame.clone();
            let frame_id = frame_id.clone();
            *frame.borrow_mut() = Some(Closure::wrap(Box::new(move || {
                frame_id.set(None);
                {
                    let mut field = field.borrow_mut();
                    let _timer = if field.config().profile_frames {
                        Some(Timer::new("ParticleField::render"))
                    } else {
                        None
                    };
                    if let Err(e) = field.render(&mut context) {
                        log::error!("particle field render failed: {:?}", e);
                    }
                }
                frames.set(frames.get() + 1);

                if let Some(callback) = next.borrow().as_ref() {
                    match window.request_animation_frame(callback.as_ref().unchecked_ref()) {
                        Ok(id) => frame_id.set(Some(id)),
                        Err(e) => log::error!("failed to request animation frame: {:?}", e),
                    }
                }
            }) as Box<dyn FnMut()>));
        }

        let listeners = Listeners {
            window,
            on_resize,
            on_mouse_move,
            on_mouse_out,
            frame,
            frame_id,
        };
        // On error `listeners` is dropped here, which detaches whatever got attached
        listeners.attach()?;
        listeners.request_frame()?;

        log::info!(
            "particle field mounted at {}x{} with {} particles",
            width,
            height,
            field.borrow().particles().len()
        );
        Ok(AetherFlow {
            field: Some(field),
            frames,
            listeners: Some(listeners),
        })
    }

    pub fn field(&self) -> Option<Ref<'_, ParticleField>> {
        self.field.as_ref().map(|field| field.borrow())
    }
}
