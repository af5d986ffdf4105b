use crate::config::{self, Config};
use crate::events::AppEvent;
use crate::gui::scene::{self, Frame, Point, State, Target};
use crate::gui::theme::{self, ThemeColors};
use crate::gui::window;
use crate::sys::media::GtkChannel;
use crate::sys::timer::GlibScheduler;
use courtship::{Assets, Channels, Experience, TimerId};
use gtk::prelude::*;
use gtk4 as gtk;
use rand::SeedableRng;
use rand::rngs::StdRng;
use relm4::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

type Session = Experience<GlibScheduler, GtkChannel>;

pub struct AppModel {
    pub experience: Session,
    pub state: Rc<RefCell<State>>,
    pub drawing_area: gtk::DrawingArea,
    pub video: gtk::Video,
    pub video_stream: gtk::MediaFile,
    pub staged_view: Option<config::ViewConfig>,
}

#[derive(Debug)]
pub enum AppMsg {
    Open,
    Reset,
    Suspend,
    Dismiss,
    Click(Point),
    CursorMove(Point),
    CursorLeave,
    Timer(TimerId),
    ConfigReload,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::Open => AppMsg::Open,
            AppEvent::Reset => AppMsg::Reset,
            AppEvent::Suspend => AppMsg::Suspend,
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

fn build_experience(config: &Config, sender: &ComponentSender<AppModel>) -> Session {
    let channels = |assets: &Assets| {
        Channels::new(
            GtkChannel::open("background", &config.view.resolve(&assets.background_audio)),
            GtkChannel::open("decline", &config.view.resolve(&assets.decline_audio)),
            GtkChannel::open("accept", &config.view.resolve(&assets.accept_audio)),
        )
    };
    let scheduler = || {
        let sender = sender.clone();
        GlibScheduler::new(move |id| sender.input(AppMsg::Timer(id)))
    };

    let settings = config.settings();
    let configured = channels(&settings.assets);
    match Experience::new(settings, scheduler(), configured, StdRng::from_entropy()) {
        Ok(session) => session,
        Err(e) => {
            log::error!("Invalid settings ({}), falling back to defaults", e);
            Experience::with_defaults(
                scheduler(),
                channels(&Assets::default()),
                StdRng::from_entropy(),
            )
        }
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (Config, async_channel::Receiver<AppEvent>);
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            add_css_class: "valentine-window",

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[sender] => move |_, key, _, _| {
                    if key == gtk::gdk::Key::Escape {
                        sender.input(AppMsg::Dismiss);
                        return glib::Propagation::Stop;
                    }
                    glib::Propagation::Proceed
                }
            },

            #[name = "overlay"]
            gtk::Overlay {
                #[name = "drawing_area"]
                gtk::DrawingArea {
                    set_hexpand: true,
                    set_vexpand: true,
                    add_css_class: "valentine-scene",

                    add_controller = gtk::EventControllerMotion {
                        connect_motion[sender] => move |_, x, y| {
                            sender.input(AppMsg::CursorMove(Point::new(x, y)));
                        },
                        connect_leave[sender] => move |_| {
                            sender.input(AppMsg::CursorLeave);
                        }
                    },

                    add_controller = gtk::GestureClick {
                        set_button: 1,
                        connect_released[sender] => move |_, _, x, y| {
                            sender.input(AppMsg::Click(Point::new(x, y)));
                        }
                    }
                }
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (config, rx) = init;

        theme::load_css();
        window::init_window(&root);

        let experience = build_experience(&config, &sender);

        let images = scene::model::Images::load(&config.view, experience.assets());
        let frame = Frame::from(&experience.presentation());
        let state = Rc::new(RefCell::new(State::new(frame, config.view.clone(), images)));

        let video_stream =
            gtk::MediaFile::for_filename(config.view.resolve(&experience.assets().video));
        video_stream.set_loop(true);
        video_stream.set_muted(true);
        let video = gtk::Video::for_media_stream(Some(&video_stream));
        video.set_autoplay(false);
        video.set_can_target(false);
        video.set_halign(gtk::Align::Center);
        video.set_valign(gtk::Align::Start);
        video.add_css_class("valentine-video");
        video.set_visible(false);

        let model = AppModel {
            experience,
            state: state.clone(),
            drawing_area: gtk::DrawingArea::default(),
            video,
            video_stream,
            staged_view: None,
        };

        let widgets = view_output!();

        let mut model = model;
        model.drawing_area = widgets.drawing_area.clone();
        widgets.overlay.add_overlay(&model.video);

        let state_draw = model.state.clone();
        widgets
            .drawing_area
            .set_draw_func(move |drawing_area, cr, width, height| {
                let style_context = drawing_area.style_context();
                let colors = ThemeColors::from_context(&style_context);
                let mut state = state_draw.borrow_mut();
                state.resize(width as f64, height as f64);
                if let Some(clock) = drawing_area.frame_clock() {
                    state.clock = clock.frame_time() as f64 / 1_000_000.0;
                }
                if let Err(e) = scene::draw(cr, &state, &colors) {
                    log::error!("Drawing error: {}", e);
                }
            });

        widgets.drawing_area.add_tick_callback(|area, _| {
            area.queue_draw();
            glib::ControlFlow::Continue
        });

        {
            let sender = sender.clone();
            window::watch_focus(&root, move || sender.input(AppMsg::Suspend));
        }
        {
            let sender = sender.clone();
            window::watch_visibility(&root, move || sender.input(AppMsg::Suspend));
        }

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, _sender: ComponentSender<Self>) {
        match msg {
            AppMsg::Open => self.experience.open(),
            AppMsg::Reset => self.reset(),
            AppMsg::Suspend => self.experience.suspend(),
            AppMsg::Dismiss => self.experience.close_popup(),
            AppMsg::Timer(id) => self.experience.on_timer(id),
            AppMsg::Click(point) => {
                let target = self.state.borrow().target_at(point);
                match target {
                    Target::Reset => self.reset(),
                    Target::Envelope => self.experience.open(),
                    Target::Accept => self.experience.accept(),
                    Target::Decline => self.experience.provoke(),
                    Target::Backdrop => self.experience.close_popup(),
                    Target::Popup | Target::Nothing => return,
                }
            }
            AppMsg::CursorMove(point) => {
                let action = self.state.borrow_mut().update_cursor(point);
                if action.entered_decline {
                    self.experience.provoke();
                } else {
                    if action.should_redraw {
                        self.drawing_area.queue_draw();
                    }
                    return;
                }
            }
            AppMsg::CursorLeave => {
                if self.state.borrow_mut().clear_hover().should_redraw {
                    self.drawing_area.queue_draw();
                }
                return;
            }
            AppMsg::ConfigReload => match config::load_config() {
                Ok(new_config) => {
                    self.state
                        .borrow_mut()
                        .images
                        .preload(&new_config.view, &new_config.assets);
                    match self.experience.stage_settings(new_config.settings()) {
                        Ok(()) => {
                            self.staged_view = Some(new_config.view);
                            log::info!("Configuration reloaded, applies on reset");
                        }
                        Err(e) => log::error!("Rejected reloaded settings: {}", e),
                    }
                }
                Err(e) => log::error!("Failed to reload config: {}", e),
            },
        }
        self.sync();
    }
}

impl AppModel {
    fn reset(&mut self) {
        self.experience.reset();
        if let Some(view) = self.staged_view.take() {
            self.state.borrow_mut().view = view;
        }
    }

    /// Pushes the experience's current presentation to the scene and the
    /// video overlay.
    fn sync(&mut self) {
        let frame = Frame::from(&self.experience.presentation());
        let show_video = frame.video.is_some();

        let mut state = self.state.borrow_mut();
        state.set_frame(frame);

        match state.layout.video.filter(|_| show_video) {
            Some(slot) => {
                self.video.set_size_request(slot.w as i32, slot.h as i32);
                self.video.set_margin_top(slot.y.max(0.0) as i32);
                if !self.video.is_visible() {
                    if self.video_stream.is_seekable() {
                        self.video_stream.seek(0);
                    }
                    self.video_stream.play();
                    self.video.set_visible(true);
                }
            }
            None => {
                if self.video.is_visible() {
                    self.video_stream.pause();
                    self.video.set_visible(false);
                }
            }
        }

        drop(state);
        self.drawing_area.queue_draw();
    }
}
