use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use std::rc::Rc;

pub fn init_window(window: &gtk::ApplicationWindow) {
    window.set_default_size(1100, 780);
    window.set_title(Some("Valentine"));
}

/// Calls `on_blur` whenever the window loses focus.
pub fn watch_focus(window: &gtk::ApplicationWindow, on_blur: impl Fn() + 'static) {
    window.connect_is_active_notify(move |w| {
        if !w.is_active() {
            on_blur();
        }
    });
}

/// Calls `on_hidden` when the window is hidden or minimised.
pub fn watch_visibility(window: &gtk::ApplicationWindow, on_hidden: impl Fn() + 'static) {
    let on_hidden = Rc::new(on_hidden);

    {
        let on_hidden = on_hidden.clone();
        window.connect_hide(move |_| on_hidden());
    }

    window.connect_realize(move |w| {
        let Some(toplevel) = w
            .surface()
            .and_then(|s| s.downcast::<gdk::Toplevel>().ok())
        else {
            return;
        };
        let on_hidden = on_hidden.clone();
        toplevel.connect_state_notify(move |t| {
            if t.state().contains(gdk::ToplevelState::MINIMIZED) {
                on_hidden();
            }
        });
    });
}
