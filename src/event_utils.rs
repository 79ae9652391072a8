use leptos::ev::{self, EventDescriptor};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{AddEventListenerOptions, Event};

#[derive(Clone, Debug)]
pub struct EventOptions {
    pub passive: bool,
    pub capture: bool,
    pub once: bool,
}

impl Default for EventOptions {
    fn default() -> Self {
        Self { passive: true, capture: false, once: false }
    }
}

/// Registered window listener. Detached by `remove` or when dropped.
pub struct WindowListener {
    event_name: String,
    callback: Option<Closure<dyn FnMut(Event)>>,
    capture: bool,
}

impl WindowListener {
    pub fn remove(mut self) {
        self.detach();
    }

    fn detach(&mut self) {
        let Some(callback) = self.callback.take() else {
            return;
        };
        if let Some(window) = web_sys::window() {
            let _ = window.remove_event_listener_with_callback_and_bool(
                &self.event_name,
                callback.as_ref().unchecked_ref(),
                self.capture,
            );
        }
    }
}

impl Drop for WindowListener {
    fn drop(&mut self) {
        self.detach();
    }
}

pub fn window_listener<E>(event: E, options: &EventOptions, mut cb: impl FnMut(E::EventType) + 'static) -> WindowListener
where
    E: EventDescriptor + 'static,
    E::EventType: JsCast,
{
    let opts = AddEventListenerOptions::new();
    opts.set_passive(options.passive);
    opts.set_capture(options.capture);
    opts.set_once(options.once);

    let event_name = event.name().into_owned();
    let callback = Closure::wrap(Box::new(move |ev: Event| {
        cb(ev.unchecked_into::<E::EventType>());
    }) as Box<dyn FnMut(Event)>);

    if let Some(window) = web_sys::window() {
        let _ = window.add_event_listener_with_callback_and_add_event_listener_options(
            &event_name,
            callback.as_ref().unchecked_ref(),
            &opts,
        );
    }

    WindowListener { event_name, callback: Some(callback), capture: options.capture }
}

/// Calls `cb` on every window resize
pub fn on_window_resize(mut cb: impl FnMut() + 'static) -> WindowListener {
    window_listener(ev::resize, &EventOptions::default(), move |_| cb())
}
