use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use palette::Srgba;

pub struct ThemeColors {
    pub backdrop_top: Srgba<f64>,
    pub backdrop_bottom: Srgba<f64>,
    pub rose: Srgba<f64>,
    pub glass: Srgba<f64>,
    pub ink: Srgba<f64>,
    pub paper: Srgba<f64>,
    pub hovered: Srgba<f64>,
    pub scrim: Srgba<f64>,
}

impl ThemeColors {
    pub fn from_context(context: &gtk::StyleContext) -> Self {
        Self {
            backdrop_top: Srgba::new(0.976, 0.659, 0.831, 1.0),
            backdrop_bottom: Srgba::new(0.769, 0.710, 0.992, 1.0),
            rose: Self::lookup_color(
                context,
                "accent_bg_color",
                Srgba::new(0.957, 0.247, 0.369, 1.0),
                None,
            ),
            glass: Srgba::new(1.0, 1.0, 1.0, 0.65),
            ink: Self::lookup_color(
                context,
                "theme_fg_color",
                Srgba::new(0.2, 0.25, 0.33, 1.0),
                Some(1.0),
            ),
            paper: Srgba::new(1.0, 0.95, 0.97, 0.95),
            hovered: Self::lookup_color(
                context,
                "theme_selected_bg_color",
                Srgba::new(1.0, 1.0, 1.0, 0.9),
                Some(0.9),
            ),
            scrim: Srgba::new(0.0, 0.0, 0.0, 0.45),
        }
    }

    fn lookup_color(
        context: &gtk::StyleContext,
        name: &str,
        fallback: Srgba<f64>,
        alpha_override: Option<f64>,
    ) -> Srgba<f64> {
        context
            .lookup_color(name)
            .map(|c| {
                let (r, g, b, a) = (
                    c.red() as f64,
                    c.green() as f64,
                    c.blue() as f64,
                    c.alpha() as f64,
                );
                Srgba::new(r, g, b, alpha_override.unwrap_or(a))
            })
            .unwrap_or(fallback)
    }
}

pub fn load_css() {
    let provider = gtk::CssProvider::new();
    let css_data = "
.valentine-window, .valentine-scene {
    background: none;
    background-color: transparent;
}
.valentine-video {
    border-radius: 18px;
}
";
    provider.load_from_data(css_data);

    if let Some(display) = gdk::Display::default() {
        gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}
