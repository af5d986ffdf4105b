use super::model::{Rect, State, Target};
use super::CORNER_RADIUS;
use crate::gui::theme::ThemeColors;
use cairo::{Context, LinearGradient};
use courtship::{PopupState, Stage};
use gdk_pixbuf::Pixbuf;
use gdk4::prelude::*;
use palette::Srgba;
use std::f64::consts::PI;

fn set_color(cr: &Context, color: Srgba<f64>) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a);
}

fn rounded(cr: &Context, rect: &Rect, radius: f64) {
    let r = radius.min(rect.w / 2.0).min(rect.h / 2.0);
    let (x, y, w, h) = (rect.x, rect.y, rect.w, rect.h);
    cr.new_sub_path();
    cr.arc(x + w - r, y + r, r, -PI / 2.0, 0.0);
    cr.arc(x + w - r, y + h - r, r, 0.0, PI / 2.0);
    cr.arc(x + r, y + h - r, r, PI / 2.0, PI);
    cr.arc(x + r, y + r, r, PI, 3.0 * PI / 2.0);
    cr.close_path();
}

fn fill_rounded(
    cr: &Context,
    rect: &Rect,
    radius: f64,
    color: Srgba<f64>,
) -> Result<(), cairo::Error> {
    rounded(cr, rect, radius);
    set_color(cr, color);
    cr.fill()
}

fn centered_text(
    cr: &Context,
    rect: &Rect,
    text: &str,
    size: f64,
    color: Srgba<f64>,
) -> Result<(), cairo::Error> {
    set_color(cr, color);
    cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);
    cr.set_font_size(size);
    if let Ok(ext) = cr.text_extents(text) {
        let c = rect.center();
        cr.move_to(c.x - ext.width() / 2.0, c.y + ext.height() / 2.0);
        cr.show_text(text)?;
    }
    Ok(())
}

/// Paints `pixbuf` to cover `rect`, cropping the overflow.
fn draw_picture(cr: &Context, rect: &Rect, pixbuf: &Pixbuf) -> Result<(), cairo::Error> {
    let (pw, ph) = (pixbuf.width() as f64, pixbuf.height() as f64);
    if pw <= 0.0 || ph <= 0.0 {
        return Ok(());
    }
    let scale = (rect.w / pw).max(rect.h / ph);
    let (dx, dy) = (
        rect.x + (rect.w - pw * scale) / 2.0,
        rect.y + (rect.h - ph * scale) / 2.0,
    );

    cr.save()?;
    rounded(cr, rect, CORNER_RADIUS);
    cr.clip();
    cr.translate(dx, dy);
    cr.scale(scale, scale);
    cr.set_source_pixbuf(pixbuf, 0.0, 0.0);
    cr.paint()?;
    cr.restore()
}

fn draw_background(cr: &Context, state: &State, colors: &ThemeColors) -> Result<(), cairo::Error> {
    let gradient = LinearGradient::new(0.0, 0.0, state.layout.width, state.layout.height);
    for (offset, color) in [(0.0, colors.backdrop_top), (1.0, colors.backdrop_bottom)] {
        let (r, g, b, a) = color.into_components();
        gradient.add_color_stop_rgba(offset, r, g, b, a);
    }
    cr.set_source(&gradient)?;
    cr.paint()?;

    let (r, g, b, _) = colors.rose.into_components();
    for heart in &state.hearts {
        let c = heart.center(state.layout.width, state.layout.height);
        let (cx, cy, s) = (c.x, c.y - heart.rise(state.clock), heart.size);
        cr.move_to(cx, cy + s * 0.35);
        cr.curve_to(cx - s * 0.6, cy - s * 0.1, cx - s * 0.35, cy - s * 0.6, cx, cy - s * 0.25);
        cr.curve_to(cx + s * 0.35, cy - s * 0.6, cx + s * 0.6, cy - s * 0.1, cx, cy + s * 0.35);
        cr.close_path();
        cr.set_source_rgba(r, g, b, heart.opacity);
        cr.fill()?;
    }
    Ok(())
}

fn draw_envelope(cr: &Context, state: &State, colors: &ThemeColors) -> Result<(), cairo::Error> {
    let body = state.layout.envelope;
    let opened = state.frame.stage != Stage::Closed;

    fill_rounded(cr, &body, 32.0, colors.rose)?;

    // letter slides out once the flap lifts
    let lift = if opened { body.h * 0.45 } else { 0.0 };
    let letter = Rect::new(
        body.x + body.w * 0.1,
        body.y + 44.0 - lift,
        body.w * 0.8,
        body.h * 0.74,
    );
    fill_rounded(cr, &letter, 16.0, colors.paper)?;

    let (r, g, b, _) = colors.rose.into_components();
    cr.set_source_rgba(r * 0.9, g * 0.9, b * 0.9, 1.0);
    cr.move_to(body.x, body.y + body.h * 0.42);
    cr.line_to(body.x + body.w / 2.0, body.y + body.h * 0.75);
    cr.line_to(body.x + body.w, body.y + body.h * 0.42);
    cr.line_to(body.x + body.w, body.y + body.h);
    cr.line_to(body.x, body.y + body.h);
    cr.close_path();
    cr.fill()?;

    let flap_tip = if opened {
        body.y - body.h * 0.3
    } else {
        body.y + body.h * 0.44
    };
    set_color(cr, colors.rose);
    cr.move_to(body.x, body.y);
    cr.line_to(body.x + body.w, body.y);
    cr.line_to(body.x + body.w / 2.0, flap_tip);
    cr.close_path();
    cr.fill()?;

    let seal = body.center();
    set_color(cr, colors.paper);
    cr.arc(seal.x, seal.y + body.h * 0.04, 40.0, 0.0, 2.0 * PI);
    cr.fill()?;
    set_color(cr, colors.rose);
    cr.arc(seal.x, seal.y + body.h * 0.04, 34.0, 0.0, 2.0 * PI);
    cr.fill()
}

fn draw_question(cr: &Context, state: &State, colors: &ThemeColors) -> Result<(), cairo::Error> {
    let layout = &state.layout;
    fill_rounded(cr, &layout.card, 44.0, colors.glass)?;

    let title = Rect::new(layout.card.x, layout.card.y + 60.0, layout.card.w, 80.0);
    centered_text(cr, &title, &state.view.question, 40.0, colors.rose)?;

    let accept_color = if state.hovered == Target::Accept {
        Srgba::new(
            colors.rose.red * 0.9,
            colors.rose.green * 0.9,
            colors.rose.blue * 0.9,
            1.0,
        )
    } else {
        colors.rose
    };
    fill_rounded(cr, &layout.accept, CORNER_RADIUS, accept_color)?;
    centered_text(
        cr,
        &layout.accept,
        "YES",
        18.0 * state.frame.accept_growth,
        colors.paper,
    )?;

    fill_rounded(cr, &layout.decline, CORNER_RADIUS, colors.hovered)?;
    centered_text(
        cr,
        &layout.decline,
        "NO",
        18.0 * state.frame.decline_scale,
        colors.ink,
    )
}

fn draw_popup(cr: &Context, state: &State, colors: &ThemeColors) -> Result<(), cairo::Error> {
    let (Some(popup), Some(image)) = (state.layout.popup, state.layout.image) else {
        return Ok(());
    };

    set_color(cr, colors.scrim);
    cr.paint()?;
    fill_rounded(cr, &popup, 32.0, Srgba::new(1.0, 1.0, 1.0, 0.2))?;

    let (picture, caption) = match state.frame.popup {
        PopupState::Decline => (
            state.frame.decline_image.as_ref(),
            &state.view.decline_caption,
        ),
        PopupState::Accept => (
            state.frame.carousel_image.as_ref(),
            &state.view.accept_caption,
        ),
        PopupState::None => return Ok(()),
    };

    match picture.and_then(|p| state.images.get(p)) {
        Some(pixbuf) => draw_picture(cr, &image, pixbuf)?,
        None => fill_rounded(cr, &image, CORNER_RADIUS, colors.paper)?,
    }

    let caption_rect = match state.frame.popup {
        PopupState::Accept => Rect::new(image.x, image.y + image.h - 72.0, image.w, 56.0),
        _ => Rect::new(image.x, image.y + image.h + 8.0, image.w, 48.0),
    };
    centered_text(cr, &caption_rect, caption, 20.0, Srgba::new(1.0, 1.0, 1.0, 1.0))
}

fn draw_reset(cr: &Context, state: &State, colors: &ThemeColors) -> Result<(), cairo::Error> {
    let color = if state.hovered == Target::Reset {
        colors.hovered
    } else {
        colors.glass
    };
    fill_rounded(cr, &state.layout.reset, state.layout.reset.h / 2.0, color)?;
    centered_text(cr, &state.layout.reset, "Reset", 12.0, colors.ink)
}

pub fn draw(cr: &Context, state: &State, colors: &ThemeColors) -> Result<(), cairo::Error> {
    draw_background(cr, state, colors)?;

    match state.frame.stage {
        Stage::Closed | Stage::Opening => draw_envelope(cr, state, colors)?,
        Stage::Open => draw_question(cr, state, colors)?,
    }

    if state.frame.popup != PopupState::None {
        draw_popup(cr, state, colors)?;
    }
    draw_reset(cr, state, colors)
}
